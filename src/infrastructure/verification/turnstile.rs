//! Cloudflare Turnstile siteverify client.
//!
//! Sends the shared secret and the client's token as a form-encoded POST and
//! reads the `success` flag from the JSON reply.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::domain::verification::{BotVerifier, VerificationError};

/// Production siteverify endpoint.
pub const TURNSTILE_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

pub struct TurnstileVerifier {
    client: reqwest::Client,
    endpoint: String,
    secret: String,
}

impl TurnstileVerifier {
    /// Builds a verifier whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VerificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerificationError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            secret: secret.into(),
        })
    }
}

#[async_trait]
impl BotVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str) -> Result<bool, VerificationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(|e| VerificationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| VerificationError::Transport(e.to_string()))?;

        let verdict: SiteVerifyResponse = serde_json::from_slice(&body).map_err(|e| {
            VerificationError::MalformedResponse(format!("status {status}: {e}"))
        })?;

        if !verdict.success {
            debug!(error_codes = ?verdict.error_codes, "Turnstile rejected token");
        }

        Ok(verdict.success)
    }
}
