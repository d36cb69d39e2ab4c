//! Cross-origin policy for the browser frontend.

use axum::http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates the CORS layer.
///
/// - Methods: `GET`, `POST`, `OPTIONS`
/// - Origins: exactly `allowed_origins`
/// - Headers: `Accept`, `Authorization`, `Content-Type`
/// - Credentials: not allowed
/// - Preflight cache: 300 seconds
///
/// # Errors
///
/// Returns an error if an origin is not a valid header value.
pub fn layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(false)
        .max_age(Duration::from_secs(300)))
}
