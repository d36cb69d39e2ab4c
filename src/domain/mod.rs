//! Domain layer containing business entities and contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`verification`] - Bot verification trait and its error type
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Traits defined here are implemented in [`crate::infrastructure`].

pub mod entities;
pub mod repositories;
pub mod verification;
