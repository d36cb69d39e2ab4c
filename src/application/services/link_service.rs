//! Shorten and resolve orchestration.
//!
//! # Shorten pipeline
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. Attestation token present (403)
//! 2. Bot verification passes (403)
//! 3. Client within its rate limit (429)
//! 4. URL is a valid http/https URL (400)
//! 5. Record inserted (500 on storage failure)
//!
//! Requests rejected at steps 1-2 never consume rate-limit budget.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::application::rate_limiter::RateLimiter;
use crate::domain::repositories::UrlRepository;
use crate::domain::verification::BotVerifier;
use crate::error::AppError;
use crate::utils::base62;
use crate::utils::url_validator::is_valid_url;

/// Result of a successful shorten request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedLink {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
}

/// Service for creating and resolving short links.
pub struct LinkService {
    repository: Arc<dyn UrlRepository>,
    verifier: Arc<dyn BotVerifier>,
    rate_limiter: Arc<RateLimiter>,
    base_domain: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_domain` is prepended verbatim to every generated code, so it should
    /// carry its own scheme and trailing slash (e.g. `https://s.example/`).
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        verifier: Arc<dyn BotVerifier>,
        rate_limiter: Arc<RateLimiter>,
        base_domain: String,
    ) -> Self {
        Self {
            repository,
            verifier,
            rate_limiter,
            base_domain,
        }
    }

    /// Runs the admission pipeline and stores `url` on success.
    ///
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] if the token is empty, rejected, or cannot be verified
    /// - [`AppError::RateLimited`] if `client_key` has used its budget
    /// - [`AppError::Validation`] if `url` is not an absolute http/https URL
    /// - [`AppError::Internal`] on storage failure
    pub async fn shorten(
        &self,
        client_key: &str,
        url: String,
        token: &str,
    ) -> Result<ShortenedLink, AppError> {
        if token.is_empty() {
            return Err(AppError::forbidden(
                "Turnstile required",
                json!({ "client": client_key, "reason": "missing token" }),
            ));
        }

        match self.verifier.verify(token).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(AppError::forbidden(
                    "Bot verification failed",
                    json!({ "client": client_key, "reason": "token rejected" }),
                ));
            }
            Err(e) => {
                warn!(client = %client_key, error = %e, "Bot verification errored");
                return Err(AppError::forbidden(
                    "Bot verification failed",
                    json!({ "client": client_key, "reason": e.to_string() }),
                ));
            }
        }

        if !self.rate_limiter.allow(client_key) {
            return Err(AppError::rate_limited(
                "Rate limit exceeded. Try again later.",
                json!({ "client": client_key }),
            ));
        }

        if !is_valid_url(&url) {
            return Err(AppError::bad_request(
                "Invalid URL format",
                json!({ "client": client_key, "url": url }),
            ));
        }

        let record = self.repository.create(&url).await?;

        let id = u64::try_from(record.id).map_err(|_| {
            AppError::internal(
                "Internal server error",
                json!({ "reason": "negative identifier", "id": record.id }),
            )
        })?;
        let code = base62::encode(id);
        let short_url = self.short_url(&code);

        info!(client = %client_key, id = record.id, code = %code, url = %record.original_url, "Short link created");

        Ok(ShortenedLink {
            code,
            short_url,
            original_url: record.original_url,
        })
    }

    /// Resolves a short code to the stored URL.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `code` is not valid base62
    /// - [`AppError::NotFound`] if no record has the decoded identifier
    /// - [`AppError::Internal`] on storage failure
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let id = base62::decode(code).map_err(|e| {
            AppError::bad_request(
                "Invalid shortened ID",
                json!({ "code": code, "reason": e.to_string() }),
            )
        })?;

        // Identifiers are positive BIGSERIAL values, so anything wider cannot exist.
        let Ok(id) = i64::try_from(id) else {
            return Err(AppError::not_found(
                "Shortened URL not found",
                json!({ "code": code, "id": id }),
            ));
        };

        self.repository
            .find_by_id(id)
            .await?
            .map(|record| record.original_url)
            .ok_or_else(|| {
                AppError::not_found("Shortened URL not found", json!({ "code": code, "id": id }))
            })
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}{}", self.base_domain, code)
    }
}
