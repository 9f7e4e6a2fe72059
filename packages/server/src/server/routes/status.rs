//! Service status aggregation endpoint.

use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::kernel::health::{aggregate, ServiceStatus, SystemHealth, SLOW_SERVICE_THRESHOLD_MS};
use crate::kernel::health::DEFAULT_PROBE_TIMEOUT;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct ServiceStatusResponse {
    pub system: SystemHealth,
    pub services: Vec<ServiceStatus>,
    pub metrics: StatusMetrics,
}

#[derive(Serialize)]
pub struct StatusMetrics {
    #[serde(rename = "averageResponseTime")]
    pub average_response_time: u64,
    #[serde(rename = "slowServices")]
    pub slow_services: Vec<String>,
    #[serde(rename = "totalResponseTime")]
    pub total_response_time: u64,
}

pub fn compute_metrics(statuses: &[ServiceStatus]) -> StatusMetrics {
    let response_times: Vec<u64> = statuses
        .iter()
        .filter_map(|s| s.response_time_ms)
        .collect();

    let total_response_time: u64 = response_times.iter().sum();
    let average_response_time = if response_times.is_empty() {
        0
    } else {
        total_response_time / response_times.len() as u64
    };

    let slow_services = statuses
        .iter()
        .filter(|s| s.response_time_ms.unwrap_or(0) > SLOW_SERVICE_THRESHOLD_MS)
        .map(|s| s.name.clone())
        .collect();

    StatusMetrics {
        average_response_time,
        slow_services,
        total_response_time,
    }
}

/// `GET /api/service-status`
///
/// Probes every declared health endpoint, then reports the aggregate
/// system health plus per-service detail and response-time metrics.
pub async fn service_status_handler(
    Extension(state): Extension<AppState>,
) -> Json<ServiceStatusResponse> {
    for (name, endpoint) in &state.health_endpoints {
        state
            .tracker
            .check_service(name, endpoint, DEFAULT_PROBE_TIMEOUT)
            .await;
    }

    let services = state.tracker.get_all_statuses().await;
    let system = aggregate(&services);
    let metrics = compute_metrics(&services);

    Json(ServiceStatusResponse {
        system,
        services,
        metrics,
    })
}
