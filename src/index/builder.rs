//! Offline indexing pass
//!
//! Reads every stored document, feeds its tokens into a fresh inverted
//! index, and finalizes it. Runs independently of the crawl.

use crate::index::inverted::{IndexError, InvertedIndex};
use crate::storage::DocumentStore;
use crate::text::tokenize;
use crate::Result;

/// Builds a finalized index over every document in the store
///
/// Title and content tokens are indexed together. Documents the index
/// rejects (no tokens, repeated doc id) are skipped with a warning rather
/// than aborting the pass.
pub fn build_index(store: &dyn DocumentStore) -> Result<InvertedIndex> {
    let mut index = InvertedIndex::new();
    let documents = store.all_documents()?;
    let total = documents.len();

    for doc in documents {
        let mut doc_tokens = tokenize(&doc.title);
        doc_tokens.extend(tokenize(&doc.content));

        match index.add_document(doc.doc_id, &doc_tokens) {
            Ok(()) => {}
            Err(e @ (IndexError::EmptyDocument(_) | IndexError::DuplicateDocument(_))) => {
                tracing::warn!("Skipping document: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    index.finalize();
    tracing::info!(
        "Indexed {} of {} stored documents",
        index.doc_count(),
        total
    );

    Ok(index)
}
