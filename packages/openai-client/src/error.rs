//! Error types for the OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// Errors returned by the OpenAI client.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Client misconfiguration (missing API key, bad base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure (connection refused, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the API (rate limit, quota, bad request)
    #[error("OpenAI API error: {0}")]
    Api(String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}
