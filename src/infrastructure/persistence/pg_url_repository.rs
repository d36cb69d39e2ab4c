//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// PostgreSQL repository for the `urls` table.
///
/// Queries are bound parameters; the insert is a single-row statement and needs
/// no surrounding transaction.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, original_url: &str) -> Result<UrlRecord, AppError> {
        let (id, original_url): (i64, String) = sqlx::query_as(
            "INSERT INTO urls (original_url) VALUES ($1) RETURNING id, original_url",
        )
        .bind(original_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(UrlRecord::new(id, original_url))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        let original_url: Option<String> =
            sqlx::query_scalar("SELECT original_url FROM urls WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(original_url.map(|url| UrlRecord::new(id, url)))
    }
}
