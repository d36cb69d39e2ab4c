//! URL record entity representing a stored long URL.

/// A persisted long URL keyed by its storage-assigned identifier.
///
/// The short code is not part of the record; it is always derived from `id`
/// with [`crate::utils::base62::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(id: i64, original_url: String) -> Self {
        Self { id, original_url }
    }
}
