//! Service health probing and aggregation.
//!
//! `check_service_health` is the single probe primitive: it never
//! propagates an error, it just answers healthy or not. The tracker
//! keeps last-known state per service name (last-write-wins, no ordering
//! guarantee beyond call completion), and `aggregate` folds tracked
//! statuses into one system-level summary for the dashboard.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Response time above which a service counts as slow in the metrics.
pub const SLOW_SERVICE_THRESHOLD_MS: u64 = 2000;

/// Probe one endpoint; true iff it answered 2xx within the timeout.
///
/// Never returns an error: timeouts, transport failures, and non-success
/// statuses all read as unhealthy.
pub async fn check_service_health(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> bool {
    match client.head(url).timeout(timeout).send().await {
        Ok(response) => response.status().is_success(),
        Err(err) => {
            debug!(url = %url, error = %err, "Health probe failed");
            false
        }
    }
}

/// Health state of one tracked service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
    Checking,
}

/// Last-known status of one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub name: String,
    pub status: HealthState,
    #[serde(rename = "responseTime", skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(rename = "lastChecked", skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
}

impl ServiceStatus {
    fn checking(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: HealthState::Checking,
            response_time_ms: None,
            last_checked: None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

/// Addressable map from service name to last-known health.
pub struct ServiceStatusTracker {
    client: reqwest::Client,
    statuses: RwLock<HashMap<String, ServiceStatus>>,
}

impl ServiceStatusTracker {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            statuses: RwLock::new(HashMap::new()),
        }
    }

    /// Register a service in the `checking` state before its first probe.
    pub async fn register(&self, name: &str) {
        let mut statuses = self.statuses.write().await;
        statuses
            .entry(name.to_string())
            .or_insert_with(|| ServiceStatus::checking(name));
    }

    /// Probe `endpoint` once and overwrite the entry for `name`.
    ///
    /// Concurrent calls for the same name race last-write-wins.
    pub async fn check_service(&self, name: &str, endpoint: &str, timeout: Duration) -> bool {
        let start = Instant::now();
        let healthy = check_service_health(&self.client, endpoint, timeout).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !healthy {
            warn!(service = name, endpoint = endpoint, "Service reported unhealthy");
        }

        let mut statuses = self.statuses.write().await;
        statuses.insert(
            name.to_string(),
            ServiceStatus {
                name: name.to_string(),
                status: if healthy {
                    HealthState::Healthy
                } else {
                    HealthState::Unhealthy
                },
                response_time_ms: Some(elapsed_ms),
                last_checked: Some(Utc::now()),
            },
        );

        healthy
    }

    pub async fn get_service_status(&self, name: &str) -> Option<ServiceStatus> {
        self.statuses.read().await.get(name).cloned()
    }

    pub async fn get_all_statuses(&self) -> Vec<ServiceStatus> {
        let mut statuses: Vec<ServiceStatus> =
            self.statuses.read().await.values().cloned().collect();
        statuses.sort_by(|a, b| a.name.cmp(&b.name));
        statuses
    }

    pub async fn get_healthy_services(&self) -> Vec<String> {
        self.statuses
            .read()
            .await
            .values()
            .filter(|s| s.is_healthy())
            .map(|s| s.name.clone())
            .collect()
    }

    pub async fn get_unhealthy_services(&self) -> Vec<String> {
        self.statuses
            .read()
            .await
            .values()
            .filter(|s| s.status == HealthState::Unhealthy)
            .map(|s| s.name.clone())
            .collect()
    }
}

/// System-level classification over all tracked services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Aggregated system health summary.
#[derive(Debug, Clone, Serialize)]
pub struct SystemHealth {
    pub overall: OverallHealth,
    #[serde(rename = "healthyCount")]
    pub healthy_count: usize,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    /// Healthy fraction in [0, 1].
    pub uptime: f64,
}

/// Fold per-service statuses into one summary.
///
/// Healthy iff every service is healthy; degraded iff more than half
/// are; unhealthy otherwise.
pub fn aggregate(statuses: &[ServiceStatus]) -> SystemHealth {
    let total_count = statuses.len();
    let healthy_count = statuses.iter().filter(|s| s.is_healthy()).count();

    let overall = if healthy_count == total_count {
        OverallHealth::Healthy
    } else if healthy_count * 2 > total_count {
        OverallHealth::Degraded
    } else {
        OverallHealth::Unhealthy
    };

    let uptime = if total_count == 0 {
        1.0
    } else {
        healthy_count as f64 / total_count as f64
    };

    SystemHealth {
        overall,
        healthy_count,
        total_count,
        uptime,
    }
}

/// Periodic health poller with guaranteed teardown.
///
/// Owns a background task that re-probes every tracked endpoint on an
/// interval; `shutdown` (or drop) aborts the task so polling never
/// outlives its owner.
pub struct HealthMonitor {
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn start(
        tracker: Arc<ServiceStatusTracker>,
        endpoints: Vec<(String, String)>,
        poll_interval: Duration,
        probe_timeout: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            for (name, _) in &endpoints {
                tracker.register(name).await;
            }
            let mut ticker = tokio::time::interval(poll_interval);
            loop {
                ticker.tick().await;
                for (name, endpoint) in &endpoints {
                    tracker.check_service(name, endpoint, probe_timeout).await;
                }
            }
        });
        Self { handle }
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(name: &str, state: HealthState) -> ServiceStatus {
        ServiceStatus {
            name: name.to_string(),
            status: state,
            response_time_ms: Some(10),
            last_checked: Some(Utc::now()),
        }
    }

    #[test]
    fn test_aggregate_all_healthy() {
        let statuses = vec![
            status("api", HealthState::Healthy),
            status("ai", HealthState::Healthy),
            status("scraping", HealthState::Healthy),
        ];
        let system = aggregate(&statuses);
        assert_eq!(system.overall, OverallHealth::Healthy);
        assert_eq!(system.healthy_count, 3);
        assert!((system.uptime - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_degraded_when_more_than_half_healthy() {
        let statuses = vec![
            status("api", HealthState::Healthy),
            status("ai", HealthState::Healthy),
            status("scraping", HealthState::Unhealthy),
        ];
        let system = aggregate(&statuses);
        assert_eq!(system.overall, OverallHealth::Degraded);
        assert!((system.uptime - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_unhealthy_at_half_or_below() {
        let statuses = vec![
            status("api", HealthState::Healthy),
            status("ai", HealthState::Unhealthy),
        ];
        // Exactly half healthy is not "more than half".
        assert_eq!(aggregate(&statuses).overall, OverallHealth::Unhealthy);

        let statuses = vec![
            status("api", HealthState::Unhealthy),
            status("ai", HealthState::Unhealthy),
        ];
        assert_eq!(aggregate(&statuses).overall, OverallHealth::Unhealthy);
    }

    #[test]
    fn test_checking_counts_as_not_healthy() {
        let statuses = vec![
            status("api", HealthState::Healthy),
            status("ai", HealthState::Checking),
            status("scraping", HealthState::Healthy),
        ];
        let system = aggregate(&statuses);
        assert_eq!(system.healthy_count, 2);
        assert_eq!(system.overall, OverallHealth::Degraded);
    }

    #[tokio::test]
    async fn test_tracker_reads_and_registration() {
        let tracker = ServiceStatusTracker::new(reqwest::Client::new());
        tracker.register("ai").await;

        let st = tracker.get_service_status("ai").await.unwrap();
        assert_eq!(st.status, HealthState::Checking);
        assert!(tracker.get_healthy_services().await.is_empty());
        assert!(tracker.get_service_status("unknown").await.is_none());
    }
}
