//! Route-level tests driving the full router with mock dependencies.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use openai_client::OpenAIClient;
use serde_json::{json, Value};
use tower::ServiceExt;

use server_core::kernel::test_dependencies::{
    sample_bundle, FailingGenerator, StaticGenerator, StaticScraper,
};
use server_core::kernel::{BaseContentGenerator, ResilienceConfig};
use server_core::server::{build_app, AppDeps};

fn app_with(generator: Option<Arc<dyn BaseContentGenerator>>) -> Router {
    app_with_ai(generator, None)
}

fn app_with_ai(
    generator: Option<Arc<dyn BaseContentGenerator>>,
    ai_client: Option<OpenAIClient>,
) -> Router {
    let deps = AppDeps {
        scraper: Arc::new(StaticScraper::with_markdown(
            "Charming 3 bed, 2 bath home for $450,000",
        )),
        generator,
        ai_client,
        public_base_url: "http://127.0.0.1:0".to_string(),
        resilience: ResilienceConfig {
            // Failures should surface immediately in these tests.
            max_retries: 0,
            ..Default::default()
        },
    };
    build_app(deps).0
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn generate_with_manual_text_returns_ai_bundle() {
    let app = app_with(Some(Arc::new(StaticGenerator::new(sample_bundle()))));

    let response = app
        .oneshot(post(
            "/api/generate",
            json!({"manualText": "Charming 3 bed home", "modules": ["social"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["instagram"], "Just listed: sunlit craftsman!");
    assert_eq!(body["modules"], json!(["social"]));
    assert!(body.get("scrapedData").is_none());
}

#[tokio::test]
async fn generate_with_url_attaches_scraped_data() {
    let app = app_with(Some(Arc::new(StaticGenerator::new(sample_bundle()))));

    let response = app
        .oneshot(post(
            "/api/generate",
            json!({"url": "https://example.com/listing/42"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["scrapedData"]["url"], "https://example.com/listing/42");
}

#[tokio::test]
async fn generate_without_input_is_rejected() {
    let app = app_with(Some(Arc::new(StaticGenerator::new(sample_bundle()))));

    let response = app.oneshot(post("/api/generate", json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["fallbackAvailable"], false);
    assert_eq!(body["serviceStatus"], "error");
}

#[tokio::test]
async fn generate_with_malformed_url_is_rejected() {
    let app = app_with(Some(Arc::new(StaticGenerator::new(sample_bundle()))));

    let response = app
        .oneshot(post("/api/generate", json!({"url": "not a url at all"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_failure_maps_to_error_envelope() {
    let app = app_with(Some(Arc::new(FailingGenerator::new(
        "OpenAI rejected the request",
    ))));

    let response = app
        .oneshot(post("/api/generate", json!({"manualText": "some listing"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["fallbackAvailable"], true);
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("OpenAI rejected the request"));
}

#[tokio::test]
async fn generate_timeout_failure_maps_to_gateway_timeout() {
    let app = app_with(Some(Arc::new(FailingGenerator::new(
        "Request timeout after 30000ms",
    ))));

    let response = app
        .oneshot(post("/api/generate", json!({"manualText": "some listing"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body = json_body(response).await;
    assert_eq!(body["fallbackAvailable"], true);
}

#[tokio::test]
async fn generate_without_ai_serves_template_content() {
    let app = app_with(None);

    let response = app
        .oneshot(post("/api/generate", json!({"manualText": "Cozy cabin"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(!body["data"]["instagram"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn fallback_always_answers_with_a_full_bundle() {
    let app = app_with(None);

    let response = app
        .oneshot(post(
            "/api/fallback",
            json!({"input": "Spacious loft downtown", "type": "social"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "fallback");
    assert!(!body["data"]["mls_description"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn fallback_accepts_property_data_alias() {
    let app = app_with(None);

    let response = app
        .oneshot(post(
            "/api/fallback",
            json!({"propertyData": "Two bed condo with balcony"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn fallback_modules_select_listing_kind_when_type_absent() {
    let app = app_with(None);

    let response = app
        .oneshot(post(
            "/api/fallback",
            json!({"input": "granite counters, pool, fenced yard", "modules": ["listing"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["data"]["key_features"].is_array());
    assert!(body["data"]["neighborhood_highlights"].is_array());
}

#[tokio::test]
async fn fallback_without_any_input_is_rejected() {
    let app = app_with(None);

    let response = app.oneshot(post("/api/fallback", json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["fallbackAvailable"], false);
}

#[tokio::test]
async fn ai_health_probe_carries_the_bearer_token() {
    // Stub provider that only answers 2xx to the configured key, the
    // way the real models endpoint rejects unauthenticated requests.
    let stub = Router::new().route(
        "/models",
        axum::routing::get(|headers: axum::http::HeaderMap| async move {
            match headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
            {
                Some("Bearer sk-test") => StatusCode::OK,
                _ => StatusCode::UNAUTHORIZED,
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });

    let client = OpenAIClient::new("sk-test").with_base_url(format!("http://{}", addr));
    let app = app_with_ai(None, Some(client));
    let response = app.oneshot(get("/api/health/ai")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let client = OpenAIClient::new("sk-wrong").with_base_url(format!("http://{}", addr));
    let app = app_with_ai(None, Some(client));
    let response = app.oneshot(get("/api/health/ai")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["status"], "unreachable");
}

#[tokio::test]
async fn health_routes_report_expected_statuses() {
    let app = app_with(None);

    let response = app.clone().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/health/scraping")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // No API key configured, so the AI capability reads unhealthy.
    let response = app.oneshot(get("/api/health/ai")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["status"], "unconfigured");
}
