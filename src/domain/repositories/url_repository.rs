//! Repository trait for URL record storage.

use crate::domain::entities::UrlRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for stored URLs.
///
/// Records are insert-only: each successful shorten request creates exactly one
/// row and nothing updates or deletes it afterwards.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new record and returns it with its freshly assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, original_url: &str) -> Result<UrlRecord, AppError>;

    /// Finds a record by identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlRecord))` if found
    /// - `Ok(None)` if no row has this identifier
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError>;
}
