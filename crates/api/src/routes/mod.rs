//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod reports;

/// Creates the versioned API router.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(reports::routes())
}
