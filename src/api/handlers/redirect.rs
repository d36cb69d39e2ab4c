//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Errors
///
/// - 400 Bad Request - code contains characters outside the base62 alphabet
/// - 404 Not Found - no link has this code
/// - 500 Internal Server Error - storage failure
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.link_service.resolve(&code).await?;

    info!(code = %code, url = %original_url, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]))
}
