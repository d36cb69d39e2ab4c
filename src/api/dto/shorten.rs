//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};

/// Request to shorten a single URL.
///
/// Both fields default to empty so that a missing field reaches the admission
/// pipeline (and is rejected there) rather than failing deserialization.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub url: String,

    /// Token produced by the Turnstile widget in the browser.
    #[serde(default, rename = "turnstileToken")]
    pub turnstile_token: String,
}

/// Response for a newly created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub shortened_url: String,
    pub original_url: String,
}
