//! # Suite Environment
//!
//! Loads the settings the contract suite needs from the process environment,
//! falling back to a `.env` file in the working directory.
//!
//! | Variable             | Required | Meaning                                   |
//! |----------------------|----------|-------------------------------------------|
//! | `BASE_URL`           | yes      | API root, e.g. `https://reqres.in/api`    |
//! | `API_KEY`            | no       | Sent as the `x-api-key` request header    |
//! | `REQUEST_TIMEOUT_MS` | no       | Per-request timeout in milliseconds       |

use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "BASE_URL";
pub const API_KEY_VAR: &str = "API_KEY";
pub const REQUEST_TIMEOUT_VAR: &str = "REQUEST_TIMEOUT_MS";

/// Resolved suite settings.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl SuiteConfig {
    /// Read settings from the process environment after loading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_base = lookup(BASE_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        let base_url = parse_base_url(&raw_base)?;

        let api_key = lookup(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let timeout = match lookup(REQUEST_TIMEOUT_VAR).map(|value| value.trim().to_string()) {
            Some(raw) if !raw.is_empty() => Some(parse_timeout(&raw)?),
            _ => None,
        };

        Ok(Self {
            base_url,
            api_key,
            timeout,
        })
    }

    /// URL of the users listing endpoint.
    pub fn users_url(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/users", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
