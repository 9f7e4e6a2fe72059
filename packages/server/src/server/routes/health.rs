//! Health check endpoints.
//!
//! Each returns 200 when healthy, 503 otherwise, with a small JSON body.
//! These routes are also the probe targets for the status aggregator.

use axum::{extract::Extension, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::kernel::health::DEFAULT_PROBE_TIMEOUT;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthBody {
    status: String,
    service: String,
    timestamp: DateTime<Utc>,
}

fn body(status: &str, service: &str) -> Json<HealthBody> {
    Json(HealthBody {
        status: status.to_string(),
        service: service.to_string(),
        timestamp: Utc::now(),
    })
}

/// `GET /api/health` - process liveness.
pub async fn health_handler() -> (StatusCode, Json<HealthBody>) {
    (StatusCode::OK, body("ok", "api"))
}

/// `GET /api/health/ai` - AI provider reachability.
///
/// Unconfigured AI reads as unhealthy so dashboards surface the missing
/// capability instead of silently passing. The probe goes through the
/// configured client because the provider rejects unauthenticated
/// requests.
pub async fn ai_health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthBody>) {
    match &state.ai_client {
        None => (StatusCode::SERVICE_UNAVAILABLE, body("unconfigured", "ai")),
        Some(client) => {
            if client.health_check(DEFAULT_PROBE_TIMEOUT).await {
                (StatusCode::OK, body("ok", "ai"))
            } else {
                (StatusCode::SERVICE_UNAVAILABLE, body("unreachable", "ai"))
            }
        }
    }
}

/// `GET /api/health/scraping` - scraping capability.
///
/// The scraper is local (no external provider account), so this reports
/// on the capability being wired up rather than a remote dependency.
pub async fn scraping_health_handler() -> (StatusCode, Json<HealthBody>) {
    (StatusCode::OK, body("ok", "scraping"))
}
