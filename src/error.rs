//! Application error type and its HTTP representation.
//!
//! Every variant carries a client-facing `message` and server-side `details`.
//! Details are written to the log when the error is rendered and are never
//! sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum AppError {
    /// Malformed body, invalid URL or undecodable short code (400).
    Validation { message: String, details: Value },
    /// Missing or failed bot verification (403).
    Forbidden { message: String, details: Value },
    /// Unknown short code (404).
    NotFound { message: String, details: Value },
    /// Client exceeded its request budget (429).
    RateLimited { message: String, details: Value },
    /// Storage or other server-side failure (500).
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn rate_limited(message: impl Into<String>, details: Value) -> Self {
        Self::RateLimited {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message) = match self {
            AppError::Validation { message, .. } => ("validation_error", message),
            AppError::Forbidden { message, .. } => ("forbidden", message),
            AppError::NotFound { message, .. } => ("not_found", message),
            AppError::RateLimited { message, .. } => ("rate_limited", message),
            AppError::Internal { message, .. } => ("internal_error", message),
        };

        ErrorInfo {
            code,
            message: message.clone(),
        }
    }

    fn details(&self) -> &Value {
        match self {
            AppError::Validation { details, .. }
            | AppError::Forbidden { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::RateLimited { details, .. }
            | AppError::Internal { details, .. } => details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let info = self.to_error_info();

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                code = info.code,
                details = %self.details(),
                "{}",
                info.message
            );
        } else {
            tracing::warn!(
                status = status.as_u16(),
                code = info.code,
                details = %self.details(),
                "{}",
                info.message
            );
        }

        (status, Json(ErrorBody { error: info })).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::internal("Internal server error", json!({ "db_error": e.to_string() }))
    }
}
