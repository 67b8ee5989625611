//! Violation detection endpoint

use crate::{ApiError, AppState};
use axum::{
    extract::{rejection::BytesRejection, State},
    Json,
};
use bytes::Bytes;
use roadwatch_detect::{AnalysisResult, DetectError, DetectionResponse};
use tracing::warn;

/// POST /detect-violations
///
/// Body: `{"image": "<data url or base64>"}`. Answers 200 with the
/// violation array, or 500 with `{error, violations: []}`.
pub async fn detect_violations(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<DetectionResponse>, ApiError> {
    let body = body.map_err(|e| DetectError::MalformedRequest(e.body_text()))?;

    match state.detector.run(&body).await {
        Ok(violations) => {
            let result = AnalysisResult::success(violations);
            Ok(Json(DetectionResponse::from(&result)))
        }
        Err(err) => {
            match err.detail() {
                Some(detail) => {
                    warn!("detect-violations failed ({}): {} - {}", err.kind(), err, detail)
                }
                None => warn!("detect-violations failed ({}): {}", err.kind(), err),
            }
            Err(ApiError(err))
        }
    }
}
