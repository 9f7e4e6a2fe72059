// Main entry point for the listing marketing server

use std::time::Duration;

use anyhow::{Context, Result};
use server_core::{
    kernel::{health::DEFAULT_PROBE_TIMEOUT, HealthMonitor},
    server::{build_app, AppDeps},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Listcast listing marketing server");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let deps = AppDeps::from_config(&config).context("Failed to build dependencies")?;
    let (app, state) = build_app(deps);

    // Periodic health polling; the monitor's task is aborted on drop so
    // polling stops with the server.
    let _monitor = if state.resilience.enable_monitoring {
        Some(HealthMonitor::start(
            state.tracker.clone(),
            state.health_endpoints.clone(),
            Duration::from_secs(config.health_poll_interval_secs),
            DEFAULT_PROBE_TIMEOUT,
        ))
    } else {
        None
    };

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/api/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
