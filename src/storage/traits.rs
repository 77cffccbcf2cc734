//! Document store trait and error types

use crate::storage::DocumentRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt record for doc {0}: {1}")]
    CorruptRecord(u64, String),

    #[error("Doc id {0} already stored")]
    DuplicateDocId(u64),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document store backends
///
/// Stores the metadata and extracted text of crawled pages, keyed by the
/// doc id the coordinator assigned at store time. Implementations must be
/// safe to share across worker tasks.
pub trait DocumentStore: Send + Sync {
    /// Persists a document record
    fn put(&self, record: &DocumentRecord) -> StorageResult<()>;

    /// Retrieves a document by id, or None when absent
    fn get_info(&self, doc_id: u64) -> StorageResult<Option<DocumentRecord>>;

    /// Returns every stored document, ordered by doc id
    ///
    /// Used by the indexing pass.
    fn all_documents(&self) -> StorageResult<Vec<DocumentRecord>>;

    /// Number of stored documents
    fn count(&self) -> StorageResult<u64>;

    /// Highest doc id present, or 0 when the store is empty
    ///
    /// The coordinator seeds its id counter past this value.
    fn max_doc_id(&self) -> StorageResult<u64>;
}
