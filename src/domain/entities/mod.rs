//! Core domain entities.
//!
//! - [`UrlRecord`] - A stored long URL and its identifier

pub mod url_record;

pub use url_record::UrlRecord;
