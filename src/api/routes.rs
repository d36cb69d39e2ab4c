//! API route configuration.

use crate::api::handlers::shorten_handler;
use crate::state::AppState;
use axum::{Router, routing::post};

/// API routes.
///
/// Paths are absolute so the routes can be merged into the top-level router
/// and share its method-not-allowed fallback.
///
/// # Endpoints
///
/// - `POST /api/shorten` - Create a short link (bot-verified, rate limited)
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/shorten", post(shorten_handler))
}
