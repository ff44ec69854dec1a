use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One page of the users listing as returned by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageResponse {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    #[serde(default)]
    pub total_pages: Option<u64>,
    pub data: Vec<UserRecord>,
}

impl PageResponse {
    /// Page count implied by `total` and `per_page`.
    pub fn implied_total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page)
    }
}

/// A user entry. Fields are kept as raw JSON so that shape checks can tell a
/// missing key (`None`) apart from an explicit `null` (`Some(Value::Null)`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserRecord {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub first_name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub last_name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub avatar: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Outcome of a successful listing call.
#[derive(Debug, Clone)]
pub struct ListUsersResponse {
    pub status: u16,
    pub duration_ms: u128,
    pub body: PageResponse,
}
