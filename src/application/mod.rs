//! Application layer implementing the shorten and resolve use cases.
//!
//! - [`services::link_service::LinkService`] - Admission pipeline and redirect lookup
//! - [`rate_limiter::RateLimiter`] - Per-client fixed-window limiter with background sweep

pub mod rate_limiter;
pub mod services;
