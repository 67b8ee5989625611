//! HTTP error responses

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use roadwatch_detect::{DetectError, DetectionResponse};

/// Response header carrying the machine-readable failure kind
pub const ERROR_KIND_HEADER: HeaderName = HeaderName::from_static("x-error-kind");

/// Gateway failure as seen by the HTTP layer.
///
/// Every kind maps to the same status and body shape; callers that need
/// the cause read the `x-error-kind` header.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DetectError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let body = Json(DetectionResponse {
            error: Some(self.0.to_string()),
            violations: Vec::new(),
        });

        let mut response = (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
        response
            .headers_mut()
            .insert(ERROR_KIND_HEADER, HeaderValue::from_static(kind.as_str()));
        response
    }
}
