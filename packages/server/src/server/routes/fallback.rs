//! Template fallback endpoint.
//!
//! The guaranteed degradation path: given any input text it responds 200
//! with a complete bundle. The only failure is entirely absent input.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::common::{ContentModule, ErrorResponse, FallbackRequest, FallbackResponse};
use crate::kernel::{generate_fallback, FallbackKind};

/// The explicit `type` wins; otherwise a listing-only modules request
/// selects the listing shape, and everything else gets social.
fn requested_kind(request: &FallbackRequest) -> FallbackKind {
    if let Some(kind) = request.kind {
        return kind;
    }
    match request.modules.as_deref() {
        Some([ContentModule::Listing]) => FallbackKind::Listing,
        _ => FallbackKind::Social,
    }
}

/// `POST /api/fallback`
pub async fn fallback_handler(Json(request): Json<FallbackRequest>) -> Response {
    let kind = requested_kind(&request);
    let input = request.input.or(request.property_data);

    let input = match input {
        Some(text) => text,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Input text is required for fallback content".to_string(),
                    service_status: "error".to_string(),
                    details: None,
                    timestamp: Utc::now(),
                    fallback_available: false,
                }),
            )
                .into_response();
        }
    };

    let bundle = generate_fallback(&input, kind);

    (
        StatusCode::OK,
        Json(FallbackResponse {
            success: true,
            data: bundle,
            source: "fallback".to_string(),
            timestamp: Utc::now(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: Option<FallbackKind>, modules: Option<Vec<ContentModule>>) -> FallbackRequest {
        FallbackRequest {
            input: None,
            property_data: None,
            kind,
            modules,
        }
    }

    #[test]
    fn test_explicit_type_wins_over_modules() {
        let req = request(Some(FallbackKind::Social), Some(vec![ContentModule::Listing]));
        assert_eq!(requested_kind(&req), FallbackKind::Social);
    }

    #[test]
    fn test_modules_select_kind_when_type_absent() {
        let req = request(None, Some(vec![ContentModule::Listing]));
        assert_eq!(requested_kind(&req), FallbackKind::Listing);

        let req = request(None, Some(vec![ContentModule::Social, ContentModule::Listing]));
        assert_eq!(requested_kind(&req), FallbackKind::Social);

        assert_eq!(requested_kind(&request(None, None)), FallbackKind::Social);
    }
}
