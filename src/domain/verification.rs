//! Bot verification contract.
//!
//! A shorten request carries an attestation token issued by a challenge widget
//! in the browser. The token is only meaningful to the third-party service that
//! issued it, so the domain layer sees verification as an opaque async check.

use async_trait::async_trait;
use thiserror::Error;

/// Failure to obtain a verdict from the verification service.
///
/// Callers treat this exactly like a negative verdict; the distinction only
/// matters for logging.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("verification request failed: {0}")]
    Transport(String),

    #[error("malformed verification response: {0}")]
    MalformedResponse(String),
}

/// Verifies attestation tokens against an external service.
///
/// # Implementations
///
/// - [`crate::infrastructure::verification::TurnstileVerifier`] - Cloudflare Turnstile
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BotVerifier: Send + Sync {
    /// Returns the service's verdict for `token`.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError`] if the service could not be reached or its
    /// response could not be decoded.
    async fn verify(&self, token: &str) -> Result<bool, VerificationError>;
}
