//! Health probe and status tracker tests against live throwaway servers.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};

use server_core::kernel::health::HealthState;
use server_core::kernel::{aggregate, check_service_health, OverallHealth, ServiceStatusTracker};

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn probe_timeout() -> Duration {
    Duration::from_millis(500)
}

#[tokio::test]
async fn healthy_endpoint_probes_true() {
    let addr = spawn(Router::new().route("/api/health", get(|| async { "ok" }))).await;

    let client = reqwest::Client::new();
    let healthy = check_service_health(
        &client,
        &format!("http://{}/api/health", addr),
        probe_timeout(),
    )
    .await;

    assert!(healthy);
}

#[tokio::test]
async fn error_status_probes_false() {
    let addr = spawn(Router::new().route(
        "/api/health",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;

    let client = reqwest::Client::new();
    let healthy = check_service_health(
        &client,
        &format!("http://{}/api/health", addr),
        probe_timeout(),
    )
    .await;

    assert!(!healthy);
}

#[tokio::test]
async fn slow_endpoint_times_out_as_unhealthy() {
    let addr = spawn(Router::new().route(
        "/api/health",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            "ok"
        }),
    ))
    .await;

    let client = reqwest::Client::new();
    let start = std::time::Instant::now();
    let healthy = check_service_health(
        &client,
        &format!("http://{}/api/health", addr),
        probe_timeout(),
    )
    .await;

    assert!(!healthy);
    // The probe gives up at its own timeout, not the handler's sleep.
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn unreachable_endpoint_probes_false() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = reqwest::Client::new();
    let healthy = check_service_health(
        &client,
        &format!("http://{}/api/health", addr),
        probe_timeout(),
    )
    .await;

    assert!(!healthy);
}

#[tokio::test]
async fn timed_out_probe_records_response_time_near_the_bound() {
    let addr = spawn(Router::new().route(
        "/api/health",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            "ok"
        }),
    ))
    .await;

    let tracker = ServiceStatusTracker::new(reqwest::Client::new());
    let healthy = tracker
        .check_service(
            "slow",
            &format!("http://{}/api/health", addr),
            Duration::from_millis(300),
        )
        .await;

    assert!(!healthy);
    let status = tracker.get_service_status("slow").await.unwrap();
    assert_eq!(status.status, HealthState::Unhealthy);

    // The probe waited out its timeout rather than failing instantly.
    let response_time = status.response_time_ms.unwrap();
    assert!(response_time >= 250, "response_time was {response_time}ms");
    assert!(response_time < 3000, "response_time was {response_time}ms");
}

#[tokio::test]
async fn tracker_records_probe_results_and_aggregates() {
    let up = spawn(Router::new().route("/api/health", get(|| async { "ok" }))).await;
    let down = spawn(Router::new().route(
        "/api/health",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    ))
    .await;

    let tracker = ServiceStatusTracker::new(reqwest::Client::new());
    tracker
        .check_service("api", &format!("http://{}/api/health", up), probe_timeout())
        .await;
    tracker
        .check_service("ai", &format!("http://{}/api/health", up), probe_timeout())
        .await;
    tracker
        .check_service(
            "scraping",
            &format!("http://{}/api/health", down),
            probe_timeout(),
        )
        .await;

    let api = tracker.get_service_status("api").await.unwrap();
    assert_eq!(api.status, HealthState::Healthy);
    assert!(api.response_time_ms.is_some());
    assert!(api.last_checked.is_some());

    assert_eq!(
        tracker.get_unhealthy_services().await,
        vec!["scraping".to_string()]
    );

    // Two of three healthy: degraded system with a 2/3 uptime fraction.
    let statuses = tracker.get_all_statuses().await;
    let system = aggregate(&statuses);
    assert_eq!(system.overall, OverallHealth::Degraded);
    assert_eq!(system.healthy_count, 2);
    assert_eq!(system.total_count, 3);
    assert!((system.uptime - 2.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn repeat_probes_overwrite_previous_state() {
    let addr = spawn(Router::new().route("/api/health", get(|| async { "ok" }))).await;
    let endpoint = format!("http://{}/api/health", addr);

    let tracker = ServiceStatusTracker::new(reqwest::Client::new());
    tracker.register("api").await;
    assert_eq!(
        tracker.get_service_status("api").await.unwrap().status,
        HealthState::Checking
    );

    tracker.check_service("api", &endpoint, probe_timeout()).await;
    assert_eq!(
        tracker.get_service_status("api").await.unwrap().status,
        HealthState::Healthy
    );

    tracker
        .check_service("api", "http://127.0.0.1:1/api/health", probe_timeout())
        .await;
    assert_eq!(
        tracker.get_service_status("api").await.unwrap().status,
        HealthState::Unhealthy
    );
}
