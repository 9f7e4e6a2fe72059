//! Minimal OpenAI REST API client.
//!
//! Covers the two call paths the listing generator needs: plain chat
//! completions and type-safe structured output via JSON schema.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4o-mini").message(Message::user("Hello!")),
//! ).await?;
//! ```
//!
//! # Structured output
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Copy {
//!     headline: String,
//!     body: String,
//! }
//!
//! let copy: Copy = client
//!     .extract::<Copy>("gpt-4o-mini", system_prompt, user_prompt)
//!     .await?;
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{OpenAIError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Override the base URL (Azure deployments, proxies, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL suitable for a lightweight reachability probe.
    pub fn health_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    /// Probe API reachability with the configured credentials.
    ///
    /// The models endpoint rejects unauthenticated requests, so the
    /// probe has to carry the bearer token. Never errors: transport
    /// failures and non-2xx responses (including 401 for a bad key)
    /// all read as unreachable.
    pub async fn health_check(&self, timeout: std::time::Duration) -> bool {
        match self
            .http_client
            .get(self.health_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(error = %err, "OpenAI health probe failed");
                false
            }
        }
    }

    /// Chat completion.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(OpenAIError::Api(format!(
                "OpenAI API error: {}",
                error_text
            )));
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| OpenAIError::Api("No response from OpenAI".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: raw.usage,
        })
    }

    /// Structured output constrained by a JSON schema.
    ///
    /// Returns the raw JSON string produced under the schema.
    pub async fn structured_output(&self, request: StructuredRequest) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OpenAIError::Api(format!(
                "OpenAI structured output error: {}",
                error_text
            )));
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        raw.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| OpenAIError::Api("No response from OpenAI".into()))
    }

    /// Type-safe structured extraction.
    ///
    /// Generates a strict-mode JSON schema from `T` via `schemars`, sends
    /// it as the response format, and deserializes the reply.
    pub async fn extract<T: StructuredOutput>(
        &self,
        model: &str,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let schema = T::openai_schema();

        debug!(type_name = %T::type_name(), "Generated schema for extraction");

        let request = StructuredRequest::new(model, system_prompt, user_prompt, schema);
        let json_str = self.structured_output(request).await?;

        serde_json::from_str(&json_str)
            .map_err(|e| OpenAIError::Parse(format!("Failed to deserialize response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("sk-test").with_base_url("https://proxy.local/v1");
        assert_eq!(client.base_url(), "https://proxy.local/v1");
        assert_eq!(client.health_url(), "https://proxy.local/v1/models");
    }
}
