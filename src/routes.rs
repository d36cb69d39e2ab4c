//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`        - Short link redirect
//! - `POST /api/shorten`   - Create a short link
//!
//! Unknown paths get a plain-text `404`, known paths with the wrong method a
//! plain-text `405`.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Fixed origin allow-list
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{method_not_allowed_handler, not_found_handler, redirect_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and middleware, without path normalization.
///
/// # Errors
///
/// Returns an error if an allowed CORS origin is not a valid header value.
pub fn router(state: AppState, allowed_origins: &[String]) -> anyhow::Result<Router> {
    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .merge(api::routes::routes())
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .with_state(state)
        .layer(cors::layer(allowed_origins)?)
        .layer(tracing::layer());

    Ok(router)
}

/// Constructs the application service: [`router`] with trailing slashes trimmed.
///
/// # Errors
///
/// See [`router`].
pub fn app_router(
    state: AppState,
    allowed_origins: &[String],
) -> anyhow::Result<NormalizePath<Router>> {
    let router = router(state, allowed_origins)?;
    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
