//! Error types shared by configuration loading and the request driver.

use thiserror::Error;

/// Settings problems. Any of these aborts the run before a request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BASE_URL is not set")]
    MissingBaseUrl,
    #[error("BASE_URL `{value}` is not a valid URL: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
    #[error("BASE_URL `{0}` must use http or https")]
    UnsupportedScheme(String),
    #[error("REQUEST_TIMEOUT_MS `{0}` must be a positive integer")]
    InvalidTimeout(String),
    #[error("API_KEY is not a valid header value: {0}")]
    InvalidApiKey(String),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failure of a single request against the users endpoint.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Request to `{url}` failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Unexpected status {status} from `{url}`")]
    UnexpectedStatus { url: String, status: u16 },
    #[error("Failed to read response from `{url}`: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Response from `{url}` is not a user page: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

