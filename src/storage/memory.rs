//! In-memory document store for tests

use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::DocumentRecord;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Document store holding everything in a map
///
/// Exists so tests (and the search-pipeline examples) can run without
/// touching the filesystem. Mirrors the SQLite store's behavior, including
/// rejecting duplicate doc ids.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<u64, DocumentRecord>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn put(&self, record: &DocumentRecord) -> StorageResult<()> {
        let mut docs = self.docs.lock().unwrap();
        if docs.contains_key(&record.doc_id) {
            return Err(StorageError::DuplicateDocId(record.doc_id));
        }
        docs.insert(record.doc_id, record.clone());
        Ok(())
    }

    fn get_info(&self, doc_id: u64) -> StorageResult<Option<DocumentRecord>> {
        Ok(self.docs.lock().unwrap().get(&doc_id).cloned())
    }

    fn all_documents(&self) -> StorageResult<Vec<DocumentRecord>> {
        Ok(self.docs.lock().unwrap().values().cloned().collect())
    }

    fn count(&self) -> StorageResult<u64> {
        Ok(self.docs.lock().unwrap().len() as u64)
    }

    fn max_doc_id(&self) -> StorageResult<u64> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0))
    }
}
