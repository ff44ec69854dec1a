//! # Response Validation
//!
//! Pure checks over a decoded users page: pagination arithmetic in [`page`]
//! and per-record field shape in [`fields`].

pub mod fields;
pub mod page;

use std::fmt::{self, Display};

use serde::Serialize;

use crate::http::UserRecord;

pub use fields::{
    FieldViolation, UserField, ViolationKind, is_valid_avatar_url, is_valid_email, validate_user,
};
pub use page::{Mismatch, PageExpectation, PageField, check_page, check_status};

/// Every field violation found across a sequence of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checked: usize,
    pub violations: Vec<FieldViolation>,
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} field violation(s) across {} record(s)",
            self.violations.len(),
            self.checked
        )?;
        for violation in &self.violations {
            write!(f, "\n  {violation}")?;
        }
        Ok(())
    }
}

/// Validate every record, collecting all violations rather than stopping at
/// the first. An empty slice passes.
pub fn validate_users(users: &[UserRecord]) -> Result<(), ValidationReport> {
    let violations: Vec<FieldViolation> = users
        .iter()
        .enumerate()
        .flat_map(|(index, user)| validate_user(index, user))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationReport {
            checked: users.len(),
            violations,
        })
    }
}
