//! Plain-text responses for unmatched routes and methods.

use axum::http::StatusCode;

/// `404` for paths no route matches.
pub async fn not_found_handler() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "route does not exist")
}

/// `405` for a known path requested with an unsupported method.
pub async fn method_not_allowed_handler() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "method is not valid")
}
