//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use openai_client::OpenAIClient;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::{
    BaseContentGenerator, BaseWebScraper, ContentOrchestrator, ListingScraper,
    OpenAIContentGenerator, ResilienceConfig, RetryPolicy, ServiceStatusTracker,
};
use crate::server::routes::{
    ai_health_handler, fallback_handler, generate_handler, health_handler,
    scraping_health_handler, service_status_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ContentOrchestrator>,
    pub tracker: Arc<ServiceStatusTracker>,
    pub resilience: ResilienceConfig,
    /// Authenticated probe handle for the AI health route; absent when
    /// no API key is configured.
    pub ai_client: Option<OpenAIClient>,
    /// (service name, probe URL) pairs the status aggregator polls.
    pub health_endpoints: Vec<(String, String)>,
}

/// Injected dependencies for [`build_app`].
///
/// Constructed from [`Config`] in production; tests swap in mocks.
pub struct AppDeps {
    pub scraper: Arc<dyn BaseWebScraper>,
    pub generator: Option<Arc<dyn BaseContentGenerator>>,
    pub ai_client: Option<OpenAIClient>,
    pub public_base_url: String,
    pub resilience: ResilienceConfig,
}

impl AppDeps {
    pub fn from_config(config: &Config) -> Result<Self> {
        let resilience = ResilienceConfig::default();

        let scraper = ListingScraper::new(RetryPolicy::new(
            resilience.max_retries,
            crate::kernel::resilience::DEFAULT_BASE_DELAY_MS,
        ))
        .context("Failed to create listing scraper")?;

        // AI is an optional capability: without a key the app serves
        // template fallback content and reports the AI service unhealthy.
        let (generator, ai_client): (Option<Arc<dyn BaseContentGenerator>>, _) =
            match &config.openai_api_key {
                Some(key) => {
                    let client = OpenAIClient::new(key.clone());
                    tracing::info!(model = %config.openai_model, "AI content generation enabled");
                    (
                        Some(Arc::new(OpenAIContentGenerator::new(
                            client.clone(),
                            config.openai_model.clone(),
                        ))),
                        Some(client),
                    )
                }
                None => {
                    tracing::warn!("OPENAI_API_KEY not set, serving template content only");
                    (None, None)
                }
            };

        Ok(Self {
            scraper: Arc::new(scraper),
            generator,
            ai_client,
            public_base_url: config.public_base_url.clone(),
            resilience,
        })
    }
}

/// Build the Axum application router.
///
/// Returns the router plus the shared state so the caller can start the
/// health monitor against the same tracker.
pub fn build_app(deps: AppDeps) -> (Router, AppState) {
    let orchestrator = Arc::new(ContentOrchestrator::new(
        deps.scraper,
        deps.generator,
        deps.resilience.clone(),
    ));

    let tracker = Arc::new(ServiceStatusTracker::new(reqwest::Client::new()));

    let base = deps.public_base_url.trim_end_matches('/');
    let health_endpoints = vec![
        ("api".to_string(), format!("{}/api/health", base)),
        ("ai".to_string(), format!("{}/api/health/ai", base)),
        ("scraping".to_string(), format!("{}/api/health/scraping", base)),
    ];

    let state = AppState {
        orchestrator,
        tracker,
        resilience: deps.resilience,
        ai_client: deps.ai_client,
        health_endpoints,
    };

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::HEAD])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let app = Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/fallback", post(fallback_handler))
        .route("/api/health", get(health_handler))
        .route("/api/health/ai", get(ai_health_handler))
        .route("/api/health/scraping", get(scraping_health_handler))
        .route("/api/service-status", get(service_status_handler))
        .layer(Extension(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    (app, state)
}
