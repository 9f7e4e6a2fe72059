use anyhow::{ensure, Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// OpenAI capability is optional: without a key the app still serves
    /// template-based fallback content and reports the AI service unhealthy.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    /// Base URL the status aggregator uses to probe this server's own
    /// health routes.
    pub public_base_url: String,
    pub health_poll_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let health_poll_interval_secs: u64 = env::var("HEALTH_POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("HEALTH_POLL_INTERVAL_SECS must be a valid number")?;
        // tokio::time::interval panics on a zero period
        ensure!(
            health_poll_interval_secs > 0,
            "HEALTH_POLL_INTERVAL_SECS must be greater than zero"
        );

        Ok(Self {
            port,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://127.0.0.1:{}", port)),
            health_poll_interval_secs,
        })
    }
}
