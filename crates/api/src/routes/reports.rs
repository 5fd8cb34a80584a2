//! Report routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderName, HeaderValue, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use tally_core::reports::{ExportType, GeneratedReport, ReportRequest};
use tally_shared::types::ReportId;
use tracing::info;

use crate::AppState;
use crate::error::ApiError;

/// Header carrying the ID of a stored PDF report.
pub static REPORT_ID_HEADER: HeaderName = HeaderName::from_static("x-report-id");

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(generate_report))
        .route("/reports/{report_id}", get(get_report))
}

/// Generates a report; HTML is returned inline, PDF is stored and returned.
async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Response, ApiError> {
    let report = state.reports.generate_report(&request).await?;

    Ok(match report {
        GeneratedReport::Html(html) => (
            [(CONTENT_TYPE, ExportType::Html.content_type())],
            html,
        )
            .into_response(),
        GeneratedReport::Pdf { report_id, bytes } => {
            info!(%report_id, size = bytes.len(), "Returning PDF report");
            pdf_response(report_id, bytes)
        }
    })
}

/// Returns a previously generated PDF report.
async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<ReportId>,
) -> Result<Response, ApiError> {
    let bytes = state.reports.fetch_report(report_id).await?;
    Ok(pdf_response(report_id, bytes))
}

fn pdf_response(report_id: ReportId, bytes: Bytes) -> Response {
    let mut response = (
        [(CONTENT_TYPE, ExportType::Pdf.content_type())],
        bytes,
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&report_id.to_string()) {
        response.headers_mut().insert(REPORT_ID_HEADER.clone(), value);
    }
    response
}
