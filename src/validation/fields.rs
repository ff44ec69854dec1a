//! Per-record field checks for user entries.

use std::fmt::{self, Display};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::http::UserRecord;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static AVATAR_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b",
        r"([-a-zA-Z0-9()@:%_+.~#?&/=]*)",
    ))
    .expect("avatar pattern compiles")
});

/// `local@domain.tld` with no whitespace and at least one dot after the `@`.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Starts with an absolute `http`/`https` URL with a dotted host. Only the
/// start is anchored, so path segments outside the character class (commas,
/// for instance) do not reject an otherwise valid URL.
pub fn is_valid_avatar_url(value: &str) -> bool {
    AVATAR_URL_RE.is_match(value)
}

/// Field of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    Id,
    Email,
    FirstName,
    LastName,
    Avatar,
}

impl Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserField::Id => "id",
            UserField::Email => "email",
            UserField::FirstName => "first_name",
            UserField::LastName => "last_name",
            UserField::Avatar => "avatar",
        };
        write!(f, "{label}")
    }
}

/// Why a field failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    NotAString,
    Malformed { value: String },
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub index: usize,
    pub field: UserField,
    pub kind: ViolationKind,
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "data[{}].{} is missing", self.index, self.field),
            ViolationKind::NotAString => {
                write!(f, "data[{}].{} is not a string", self.index, self.field)
            }
            ViolationKind::Malformed { value } => {
                write!(f, "data[{}].{} `{value}` has the wrong shape", self.index, self.field)
            }
        }
    }
}

/// Check one record. `index` is its position in the page and is carried into
/// every violation.
pub fn validate_user(index: usize, user: &UserRecord) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    let mut push = |field, kind| violations.push(FieldViolation { index, field, kind });

    if user.id.is_none() {
        push(UserField::Id, ViolationKind::Missing);
    }
    if let Some(kind) = check_pattern(user.email.as_ref(), is_valid_email) {
        push(UserField::Email, kind);
    }
    if user.first_name.is_none() {
        push(UserField::FirstName, ViolationKind::Missing);
    }
    if user.last_name.is_none() {
        push(UserField::LastName, ViolationKind::Missing);
    }
    if let Some(kind) = check_pattern(user.avatar.as_ref(), is_valid_avatar_url) {
        push(UserField::Avatar, kind);
    }

    violations
}

fn check_pattern(value: Option<&Value>, predicate: fn(&str) -> bool) -> Option<ViolationKind> {
    match value {
        None => Some(ViolationKind::Missing),
        Some(Value::String(text)) if predicate(text) => None,
        Some(Value::String(text)) => Some(ViolationKind::Malformed {
            value: text.clone(),
        }),
        Some(_) => Some(ViolationKind::NotAString),
    }
}
