pub mod client;
pub mod request;
pub mod response;

pub use client::UsersClient;
pub use request::PageRequest;
pub use response::{ListUsersResponse, PageResponse, UserRecord};
