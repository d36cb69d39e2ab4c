//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`verification`] - Cloudflare Turnstile client

pub mod persistence;
pub mod verification;
