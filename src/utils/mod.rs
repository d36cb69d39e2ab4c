//! Helpers shared across layers.
//!
//! - [`base62`] - Short code encoding and decoding
//! - [`client_key`] - Client identity extraction for rate limiting
//! - [`url_validator`] - Acceptance check for submitted URLs

pub mod base62;
pub mod client_key;
pub mod url_validator;
