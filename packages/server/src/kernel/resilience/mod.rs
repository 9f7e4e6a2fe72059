//! Resilience layer for outbound service calls.
//!
//! Wraps calls to the scraping target and the LLM provider: bounded
//! retries with exponential backoff, error categorization for
//! user-facing messaging, and structured failure logging.

pub mod backoff;
pub mod classifier;
pub mod retry;

pub use backoff::{delay, DEFAULT_BASE_DELAY_MS};
pub use classifier::{
    categorize, categorize_reqwest, is_retryable_category, kind_of, next_steps, retry_advice,
    severity, user_message, ErrorCategory, Severity,
};
pub use retry::{
    response_is_retryable, retry_with_backoff, transport_is_retryable, RequestSpec, RetryPolicy,
};

use chrono::{DateTime, Utc};

/// Immutable resilience settings, built once at startup.
#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    pub max_retries: u32,
    pub base_timeout_ms: u64,
    pub timeout_increment_ms: u64,
    pub enable_logging: bool,
    pub enable_monitoring: bool,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_timeout_ms: 30_000,
            timeout_increment_ms: 10_000,
            enable_logging: true,
            enable_monitoring: true,
        }
    }
}

/// One failure occurrence, captured at the moment the error is caught
/// and handed straight to the logger. Never persisted.
#[derive(Debug, Clone)]
pub struct ServiceErrorInfo {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub input_type: &'static str,
    pub input_length: usize,
    pub user_agent: Option<String>,
    pub url: Option<String>,
    pub response_time_ms: u128,
    pub retry_count: u32,
}

impl ServiceErrorInfo {
    /// Emit the occurrence as a structured log record.
    pub fn log(&self) {
        tracing::error!(
            timestamp = %self.timestamp,
            error = %self.message,
            input_type = self.input_type,
            input_length = self.input_length,
            user_agent = self.user_agent.as_deref().unwrap_or("unknown"),
            url = self.url.as_deref().unwrap_or("none"),
            response_time_ms = self.response_time_ms,
            retry_count = self.retry_count,
            "Content generation failed"
        );
    }
}
