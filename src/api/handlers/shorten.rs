//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_key::ClientKey;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "turnstileToken": "0.abc..."
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "shortened_url": "https://s.example/21",
///   "original_url": "https://example.com"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request - malformed body or invalid URL
/// - 403 Forbidden - missing or failed bot verification
/// - 429 Too Many Requests - client exceeded its rate limit
/// - 500 Internal Server Error - storage failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid JSON format",
            json!({ "client": client_key, "reason": rejection.body_text() }),
        )
    })?;

    let link = state
        .link_service
        .shorten(&client_key, payload.url, &payload.turnstile_token)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            shortened_url: link.short_url,
            original_url: link.original_url,
        }),
    ))
}
