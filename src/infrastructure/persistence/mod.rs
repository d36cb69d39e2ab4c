//! PostgreSQL repository implementations.
//!
//! - [`PgUrlRepository`] - URL record storage and lookup

pub mod pg_url_repository;

pub use pg_url_repository::PgUrlRepository;
