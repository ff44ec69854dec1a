use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use std::time::Instant;
use tracing::{debug, info};

use crate::environment::SuiteConfig;
use crate::error::{ConfigError, DriverError};

use super::request::PageRequest;
use super::response::{ListUsersResponse, PageResponse};

const API_KEY_HEADER: &str = "x-api-key";

/// Issues listing calls against `{base_url}/users`. One GET per call, no
/// retries and no caching.
#[derive(Debug, Clone)]
pub struct UsersClient {
    client: Client,
    users_url: Url,
}

impl UsersClient {
    pub fn new(config: &SuiteConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder().default_headers(default_headers(config)?);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ConfigError::Client)?;

        Ok(Self {
            client,
            users_url: config.users_url(),
        })
    }

    pub fn users_url(&self) -> &Url {
        &self.users_url
    }

    /// Build the request URL for the given query parameters.
    pub fn url_for(&self, request: &PageRequest) -> Url {
        let mut url = self.users_url.clone();
        let pairs = request.query_pairs();
        if !pairs.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &pairs {
                query_pairs.append_pair(key, value);
            }
        }
        url
    }

    pub async fn list_users(
        &self,
        request: &PageRequest,
    ) -> Result<ListUsersResponse, DriverError> {
        let url = self.url_for(request);
        let url_text = url.to_string();
        debug!(url = %url_text, "sending users request");

        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DriverError::Transport {
                url: url_text.clone(),
                source,
            })?;
        let elapsed = started.elapsed().as_millis();

        let status = response.status();
        let elapsed_ms = u64::try_from(elapsed).unwrap_or(u64::MAX);
        info!(url = %url_text, status = status.as_u16(), elapsed_ms, "users response");
        if !status.is_success() {
            return Err(DriverError::UnexpectedStatus {
                url: url_text,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| DriverError::Body {
            url: url_text.clone(),
            source,
        })?;
        let body: PageResponse =
            serde_json::from_slice(&bytes).map_err(|source| DriverError::Decode {
                url: url_text,
                source,
            })?;

        Ok(ListUsersResponse {
            status: status.as_u16(),
            duration_ms: elapsed,
            body,
        })
    }
}

fn default_headers(config: &SuiteConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(key) = &config.api_key {
        let value = HeaderValue::from_str(key)
            .map_err(|e| ConfigError::InvalidApiKey(e.to_string()))?;
        headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
    }

    Ok(headers)
}
