// src/github/client.rs
// =============================================================================
// A minimal GitHub REST API client.
//
// Every call site gets back an ApiResult, which keeps three outcomes apart:
// - Found:  a success status with a JSON body we could decode
// - Absent: the API answered, but there is nothing there (non-success status,
//           or a success status with an empty body)
// - Failed: we never got a usable answer (transport failure after retries,
//           or a body that is not the JSON we expected)
//
// Whether "Absent" is fine or fatal is decided by the caller: a missing
// release is expected, a missing repository is not.
//
// Retry policy:
// - Only transport failures (connect errors, timeouts) are retried
// - HTTP statuses are never retried, not even 5xx
// - The delay doubles after each failed attempt, up to MAX_RETRY_DELAY
// =============================================================================

use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Upper bound on the sleep between two attempts.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Outcome of a single API call.
#[derive(Debug)]
pub enum ApiResult<T> {
    Found(T),
    Absent { url: String, status: StatusCode },
    Failed(Error),
}

impl<T> ApiResult<T> {
    /// For resources that must exist: absence becomes an upstream error.
    pub fn required(self) -> Result<T> {
        match self {
            ApiResult::Found(value) => Ok(value),
            ApiResult::Absent { url, status } => Err(Error::upstream(url, describe_status(status))),
            ApiResult::Failed(e) => Err(e),
        }
    }

    /// For resources that may legitimately be missing.
    pub fn optional(self) -> Result<Option<T>> {
        match self {
            ApiResult::Found(value) => Ok(Some(value)),
            ApiResult::Absent { .. } => Ok(None),
            ApiResult::Failed(e) => Err(e),
        }
    }
}

fn describe_status(status: StatusCode) -> String {
    if status.is_success() {
        format!("HTTP {} with an empty body", status.as_u16())
    } else {
        format!("HTTP {}", status.as_u16())
    }
}

pub struct GitHubClient {
    client: Client,
    base_url: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl GitHubClient {
    /// Builds the HTTP client: user agent, JSON accept header, the optional
    /// token, and a per-request timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("token {token}"))
                .map_err(|_| Error::config("the access token contains characters not allowed in an HTTP header"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(concat!("org-pulse/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("could not build the HTTP client: {e}")))?;

        Ok(GitHubClient {
            client,
            base_url: config.api_base().to_string(),
            max_attempts: config.max_attempts,
            retry_delay: config.retry_delay,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `path` (which starts with `/`) and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = match self.send_with_retry(&url).await {
            Ok(response) => response,
            Err(e) => return ApiResult::Failed(e),
        };

        let status = response.status();
        if !status.is_success() {
            log::debug!("GET {url} -> {status}");
            return ApiResult::Absent { url, status };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(source) => return ApiResult::Failed(Error::Network { url, source }),
        };

        if is_empty_body(&body) {
            return ApiResult::Absent { url, status };
        }

        match serde_json::from_str(&body) {
            Ok(value) => ApiResult::Found(value),
            Err(e) => ApiResult::Failed(Error::upstream(url, format!("malformed JSON: {e}"))),
        }
    }

    async fn send_with_retry(&self, url: &str) -> Result<Response> {
        let mut attempt = 1;
        loop {
            let err = match self.client.get(url).send().await {
                Ok(response) => return Ok(response),
                Err(source) => Error::Network {
                    url: url.to_string(),
                    source,
                },
            };

            if !err.is_transient() || attempt >= self.max_attempts {
                return Err(err);
            }

            let delay = backoff_delay(self.retry_delay, attempt);
            log::debug!(
                "{err}; retrying in {}ms (attempt {} of {})",
                delay.as_millis(),
                attempt + 1,
                self.max_attempts
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Sleep after failed attempt number `attempt` (1-based): `base * 2^(attempt-1)`,
/// capped at [`MAX_RETRY_DELAY`] and never overflowing.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.checked_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
        .unwrap_or(MAX_RETRY_DELAY)
        .min(MAX_RETRY_DELAY)
}

/// A success response that carries nothing: no bytes, `null`, or `{}`.
/// An empty list (`[]`) is a real answer and does not count.
fn is_empty_body(body: &str) -> bool {
    let body = body.trim();
    if body.is_empty() || body == "null" {
        return true;
    }
    matches!(serde_json::from_str::<serde_json::Value>(body), Ok(serde_json::Value::Object(map)) if map.is_empty())
}
