#![allow(dead_code)]

pub mod users_stub;
