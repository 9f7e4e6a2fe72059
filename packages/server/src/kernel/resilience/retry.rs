//! Bounded retry with exponential backoff around one outbound request.
//!
//! Attempts are strictly sequential; each carries its own per-attempt
//! timeout. A 2xx response returns immediately. Anything else is parsed
//! as an error payload and retried only while the failure looks
//! transient and attempts remain.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::backoff::{delay, DEFAULT_BASE_DELAY_MS};

/// Bounds for one retry loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts = max_retries + 1.
    pub max_retries: u32,
    /// Base delay fed into the exponential backoff.
    pub base_delay_ms: u64,
    /// Per-attempt deadline, applied regardless of any timeout configured
    /// on the underlying client.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            ..Default::default()
        }
    }

    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }
}

/// A request that can be rebuilt for each attempt.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: Method,
    url: String,
    body: Option<serde_json::Value>,
}

impl RequestSpec {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build(&self, client: &Client, timeout: Duration) -> reqwest::RequestBuilder {
        let mut builder = client.request(self.method.clone(), &self.url).timeout(timeout);
        if let Some(body) = &self.body {
            builder = builder.json(body);
        }
        builder
    }
}

/// Error payload shape the collaborator endpoints use.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: String,
}

/// Whether a failed HTTP response warrants another attempt.
///
/// Retryable: any 5xx, 429, or an error text mentioning a timeout or an
/// unavailable service.
pub fn response_is_retryable(status: StatusCode, error_text: &str) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || error_text.contains("timeout")
        || error_text.contains("unavailable")
}

/// Whether a transport-level failure warrants another attempt.
pub fn transport_is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// Issue `spec` with bounded retries and exponential backoff.
///
/// Returns the first successful response, or the synthesized error from
/// the last failing attempt. At most `max_retries + 1` network attempts
/// are made.
pub async fn retry_with_backoff(
    client: &Client,
    spec: &RequestSpec,
    policy: &RetryPolicy,
) -> Result<reqwest::Response> {
    for attempt in 0..=policy.max_retries {
        debug!(url = %spec.url, attempt = attempt, "Issuing request");

        match spec.build(client, policy.attempt_timeout).send().await {
            Ok(response) if response.status().is_success() => {
                return Ok(response);
            }
            Ok(response) => {
                let status = response.status();
                // Tolerate unreadable/unparseable bodies by substituting a
                // status-text-only payload.
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorPayload>(&body)
                    .map(|p| p.error)
                    .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());

                if attempt < policy.max_retries && response_is_retryable(status, &message) {
                    let wait_ms = delay(attempt, policy.base_delay_ms);
                    warn!(
                        url = %spec.url,
                        status = %status,
                        attempt = attempt,
                        wait_ms = wait_ms,
                        "Retryable response, backing off"
                    );
                    tokio::time::sleep(Duration::from_millis(wait_ms)).await;
                    continue;
                }

                if message.is_empty() {
                    bail!("Request failed with status {}", status.as_u16());
                }
                return Err(anyhow!(message));
            }
            Err(err) => {
                if attempt < policy.max_retries && transport_is_retryable(&err) {
                    let wait_ms = delay(attempt, policy.base_delay_ms);
                    warn!(
                        url = %spec.url,
                        error = %err,
                        attempt = attempt,
                        wait_ms = wait_ms,
                        "Transport failure, backing off"
                    );
                    tokio::time::sleep(Duration::from_millis(wait_ms)).await;
                    continue;
                }
                return Err(err.into());
            }
        }
    }

    bail!("Max retries exceeded")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(response_is_retryable(StatusCode::INTERNAL_SERVER_ERROR, ""));
        assert!(response_is_retryable(StatusCode::SERVICE_UNAVAILABLE, ""));
        assert!(response_is_retryable(StatusCode::GATEWAY_TIMEOUT, ""));
        assert!(response_is_retryable(StatusCode::TOO_MANY_REQUESTS, ""));
    }

    #[test]
    fn test_non_retryable_statuses() {
        assert!(!response_is_retryable(StatusCode::BAD_REQUEST, ""));
        assert!(!response_is_retryable(StatusCode::UNAUTHORIZED, ""));
        assert!(!response_is_retryable(StatusCode::NOT_FOUND, ""));
    }

    #[test]
    fn test_error_text_makes_4xx_retryable() {
        assert!(response_is_retryable(
            StatusCode::BAD_REQUEST,
            "upstream timeout while scraping"
        ));
        assert!(response_is_retryable(
            StatusCode::CONFLICT,
            "service temporarily unavailable"
        ));
        assert!(!response_is_retryable(StatusCode::BAD_REQUEST, "missing url"));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay_ms, 1000);
        assert_eq!(policy.attempt_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_request_spec_builders() {
        let get = RequestSpec::get("http://localhost/x");
        assert_eq!(get.url(), "http://localhost/x");
        assert!(get.body.is_none());

        let post = RequestSpec::post_json("http://localhost/y", serde_json::json!({"a": 1}));
        assert!(post.body.is_some());
    }
}
