//! Pagination arithmetic checks.

use std::fmt::{self, Display};

use serde::Serialize;

use crate::http::PageResponse;

/// Values a page response must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageExpectation {
    pub page: u64,
    pub per_page: u64,
    pub data_len: usize,
}

/// Which part of the page disagreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageField {
    Status,
    Page,
    PerPage,
    DataLen,
}

impl Display for PageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PageField::Status => "status",
            PageField::Page => "page",
            PageField::PerPage => "per_page",
            PageField::DataLen => "data.length",
        };
        write!(f, "{label}")
    }
}

/// An expected value that the response did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub field: PageField,
    pub expected: u64,
    pub actual: u64,
}

impl Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} to be {}, got {}", self.field, self.expected, self.actual)
    }
}

pub fn check_status(expected: u16, actual: u16) -> Option<Mismatch> {
    (expected != actual).then_some(Mismatch {
        field: PageField::Status,
        expected: u64::from(expected),
        actual: u64::from(actual),
    })
}

/// Compare `page`, `per_page` and the record count against `expected`.
pub fn check_page(response: &PageResponse, expected: &PageExpectation) -> Vec<Mismatch> {
    let checks = [
        (PageField::PerPage, expected.per_page, response.per_page),
        (PageField::Page, expected.page, response.page),
        (
            PageField::DataLen,
            expected.data_len as u64,
            response.data.len() as u64,
        ),
    ];

    checks
        .into_iter()
        .filter(|(_, expected, actual)| expected != actual)
        .map(|(field, expected, actual)| Mismatch {
            field,
            expected,
            actual,
        })
        .collect()
}
