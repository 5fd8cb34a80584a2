//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tally_core::reports::ReportError;
use tally_shared::AppError;
use tracing::{error, warn};

/// Handler error rendered as `{"error": CODE, "message": ..., "retryable": bool}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        if err.is_caller_error() {
            warn!(error = %err, "Report request rejected");
        } else {
            error!(error = %err, "Report generation failed");
        }
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.to_string(),
                "retryable": self.0.is_retryable(),
            })),
        )
            .into_response()
    }
}
