//! Content generation endpoint.

use std::time::Instant;

use axum::{
    extract::Extension,
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::common::{ContentModule, ErrorResponse, GenerateRequest, GenerateResponse};
use crate::kernel::resilience::{
    categorize, severity, user_message, ErrorCategory, ServiceErrorInfo, Severity,
};
use crate::server::app::AppState;

/// Pick the single module the orchestrator runs for this request.
fn effective_module(modules: &[ContentModule]) -> ContentModule {
    match modules {
        [] => ContentModule::All,
        [single] => *single,
        _ => ContentModule::All,
    }
}

/// Map a categorized failure onto the HTTP status the client contract
/// expects: 504 timeout, 429 rate limit, 503 degraded provider, 500 rest.
fn failure_status(category: &ErrorCategory, message: &str) -> StatusCode {
    if category.is_timeout_error {
        StatusCode::GATEWAY_TIMEOUT
    } else if message.contains("Too Many Requests") || message.contains("429") {
        StatusCode::TOO_MANY_REQUESTS
    } else if category.is_scraping_error || category.is_service_error || category.is_network_error
    {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn service_status_label(category: &ErrorCategory) -> &'static str {
    match severity(category) {
        Severity::High => "unavailable",
        Severity::Medium => "degraded",
        Severity::Low => "error",
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
            service_status: "error".to_string(),
            details: None,
            timestamp: Utc::now(),
            fallback_available: false,
        }),
    )
        .into_response()
}

/// `POST /api/generate`
///
/// Scrapes (or takes manual text), extracts property facts, and runs AI
/// generation. Transient failures are retried inside the kernel; what
/// surfaces here is terminal and gets categorized for the client.
pub async fn generate_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let start = Instant::now();

    let has_manual = request
        .manual_text
        .as_deref()
        .map(|t| !t.trim().is_empty())
        .unwrap_or(false);
    let has_url = request.url.as_deref().map(|u| !u.trim().is_empty()).unwrap_or(false);

    // Fatal input problems are rejected immediately, never retried.
    if !has_manual && !has_url {
        return bad_request("Either a listing URL or manual text is required");
    }

    if !has_manual {
        if let Some(url) = request.url.as_deref() {
            let normalized = if url.starts_with("http://") || url.starts_with("https://") {
                url.to_string()
            } else {
                format!("https://{}", url)
            };
            if url::Url::parse(&normalized).is_err() {
                return bad_request("The listing URL is not a valid URL");
            }
        }
    }

    let module = effective_module(&request.modules);

    match state
        .orchestrator
        .generate(
            request.url.as_deref(),
            request.manual_text.as_deref(),
            module,
        )
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(GenerateResponse {
                success: true,
                data: outcome.bundle,
                modules: request.modules,
                scraped_data: outcome.scraped,
            }),
        )
            .into_response(),
        Err(failure) => {
            let message = format!("{:#}", failure.error);
            let category = categorize(&message, None);

            if state.resilience.enable_logging {
                let input_length = if has_manual {
                    request.manual_text.as_deref().unwrap_or("").len()
                } else {
                    request.url.as_deref().unwrap_or("").len()
                };
                ServiceErrorInfo {
                    timestamp: Utc::now(),
                    message: message.clone(),
                    input_type: if has_manual { "manual_text" } else { "url" },
                    input_length,
                    user_agent: headers
                        .get(USER_AGENT)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                    url: request.url.clone(),
                    response_time_ms: start.elapsed().as_millis(),
                    retry_count: failure.retry_count,
                }
                .log();
            }

            (
                failure_status(&category, &message),
                Json(ErrorResponse {
                    error: user_message(&category).to_string(),
                    service_status: service_status_label(&category).to_string(),
                    details: Some(message),
                    timestamp: Utc::now(),
                    fallback_available: true,
                }),
            )
                .into_response()
        }
    }
}
