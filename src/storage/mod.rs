//! Document storage module
//!
//! Crawled pages are persisted as `DocumentRecord`s behind the
//! `DocumentStore` trait: a SQLite implementation for real runs and an
//! in-memory implementation for tests.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, StorageError, StorageResult};

use chrono::{DateTime, Utc};

/// A stored document: metadata plus extracted text
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    /// Identifier assigned by the crawl coordinator at store time
    pub doc_id: u64,

    /// Canonical URL the page was fetched from
    pub url: String,

    /// Page title (empty when the page had none)
    pub title: String,

    /// Extracted text content
    pub content: String,

    /// Content-Type header of the fetch
    pub content_type: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}
