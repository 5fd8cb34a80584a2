//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for report generation and retrieval
//! - JSON error responses derived from `AppError`

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tally_core::reports::ReportService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body.
const MAX_REQUEST_BODY: usize = 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Report pipeline.
    pub reports: Arc<ReportService>,
}

impl AppState {
    /// Wraps a report service for sharing across handlers.
    #[must_use]
    pub fn new(reports: ReportService) -> Self {
        Self {
            reports: Arc::new(reports),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api/v1", routes::api_routes())
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
