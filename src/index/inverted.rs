//! TF-IDF inverted index
//!
//! Documents are ingested as token streams, then `finalize` converts the
//! stored term frequencies into TF-IDF weights and seals the index. Search
//! is only valid on a finalized index; the phase is checked by every
//! operation.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Document identifier assigned by the crawl coordinator
pub type DocId = u64;

/// Index lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting documents; scores hold raw term frequencies
    Ingesting,
    /// Sealed; scores hold TF-IDF weights and search is valid
    Finalized,
}

/// Errors from index operations
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Document {0} has no tokens")]
    EmptyDocument(DocId),

    #[error("Document {0} is already indexed")]
    DuplicateDocument(DocId),

    #[error("Index is finalized; no further documents can be added")]
    Sealed,

    #[error("Index is not finalized; search is unavailable")]
    NotFinalized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt index file: {0}")]
    Corrupt(String),
}

/// Statistics for a single term
#[derive(Debug, Clone, Serialize)]
pub struct TermStats {
    pub term: String,

    /// Number of documents containing the term
    pub document_count: u64,

    /// Sum of the term's stored scores across documents
    pub total_weight: f64,

    /// ln(doc_count / df) under the current document count
    pub idf: f64,
}

/// Whole-index statistics
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub total_documents: u64,
    pub total_terms: u64,
    pub total_postings: u64,
    pub average_document_length: f64,
}

/// Term -> posting map with TF-IDF scoring
///
/// During ingestion each posting holds tf = count / document length; after
/// `finalize` it holds tf * ln(doc_count / df).
#[derive(Debug)]
pub struct InvertedIndex {
    postings: BTreeMap<String, BTreeMap<DocId, f64>>,
    df: BTreeMap<String, u64>,
    doc_lengths: BTreeMap<DocId, u64>,
    doc_count: u64,
    phase: Phase,
}

impl InvertedIndex {
    /// Creates an empty index in the Ingesting phase
    pub fn new() -> Self {
        Self {
            postings: BTreeMap::new(),
            df: BTreeMap::new(),
            doc_lengths: BTreeMap::new(),
            doc_count: 0,
            phase: Phase::Ingesting,
        }
    }

    /// Rebuilds an index from its component parts (used by load)
    pub(crate) fn from_parts(
        postings: BTreeMap<String, BTreeMap<DocId, f64>>,
        df: BTreeMap<String, u64>,
        doc_lengths: BTreeMap<DocId, u64>,
        doc_count: u64,
        phase: Phase,
    ) -> Self {
        Self {
            postings,
            df,
            doc_lengths,
            doc_count,
            phase,
        }
    }

    pub(crate) fn postings(&self) -> &BTreeMap<String, BTreeMap<DocId, f64>> {
        &self.postings
    }

    pub(crate) fn df(&self) -> &BTreeMap<String, u64> {
        &self.df
    }

    pub(crate) fn doc_lengths(&self) -> &BTreeMap<DocId, u64> {
        &self.doc_lengths
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether `finalize` has run
    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    /// Number of indexed documents
    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    /// Ingests one document's token stream
    ///
    /// Stores tf = count / len(tokens) per unique term and updates the
    /// document-frequency table. Empty token lists are rejected, as is a
    /// doc id that was added before; both leave the index unchanged.
    ///
    /// # Errors
    ///
    /// * `IndexError::Sealed` after `finalize`
    /// * `IndexError::EmptyDocument` for an empty token list
    /// * `IndexError::DuplicateDocument` for a repeated doc id
    pub fn add_document(&mut self, doc_id: DocId, tokens: &[String]) -> Result<(), IndexError> {
        if self.phase == Phase::Finalized {
            return Err(IndexError::Sealed);
        }
        if tokens.is_empty() {
            return Err(IndexError::EmptyDocument(doc_id));
        }
        if self.doc_lengths.contains_key(&doc_id) {
            return Err(IndexError::DuplicateDocument(doc_id));
        }

        let length = tokens.len() as u64;
        let mut term_freq: BTreeMap<&str, u64> = BTreeMap::new();
        for token in tokens {
            *term_freq.entry(token.as_str()).or_insert(0) += 1;
        }

        for (term, count) in term_freq {
            let entry = self.postings.entry(term.to_string()).or_default();
            if !entry.contains_key(&doc_id) {
                *self.df.entry(term.to_string()).or_insert(0) += 1;
            }
            entry.insert(doc_id, count as f64 / length as f64);
        }

        self.doc_lengths.insert(doc_id, length);
        self.doc_count += 1;

        tracing::debug!("Indexed document {} ({} tokens)", doc_id, length);
        Ok(())
    }

    /// Converts stored term frequencies into TF-IDF weights and seals the
    /// index
    ///
    /// Idempotent: calling it on a finalized index is a no-op.
    pub fn finalize(&mut self) {
        if self.phase == Phase::Finalized {
            return;
        }

        for (term, docs) in &mut self.postings {
            let df = self.df.get(term).copied().unwrap_or(0);
            let idf = if df > 0 && self.doc_count > 0 {
                (self.doc_count as f64 / df as f64).ln()
            } else {
                0.0
            };
            for score in docs.values_mut() {
                *score *= idf;
            }
        }

        self.phase = Phase::Finalized;
        tracing::info!(
            "Index finalized: {} documents, {} terms",
            self.doc_count,
            self.postings.len()
        );
    }

    /// Evaluates a query against the finalized index
    ///
    /// Scores are additive over the query terms; a term repeated in the
    /// query contributes once per occurrence. Unknown terms are ignored.
    /// Results come back in descending score order, ties broken by lower
    /// doc id, at most `limit` entries.
    ///
    /// # Errors
    ///
    /// * `IndexError::NotFinalized` when called during ingestion
    pub fn search(&self, terms: &[String], limit: usize) -> Result<Vec<(DocId, f64)>, IndexError> {
        if self.phase != Phase::Finalized {
            return Err(IndexError::NotFinalized);
        }
        if self.doc_count == 0 || terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut scores: BTreeMap<DocId, f64> = BTreeMap::new();
        for term in terms {
            if let Some(docs) = self.postings.get(term) {
                for (doc_id, score) in docs {
                    *scores.entry(*doc_id).or_insert(0.0) += score;
                }
            }
        }

        let mut results: Vec<(DocId, f64)> = scores.into_iter().collect();
        results.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        results.truncate(limit);

        Ok(results)
    }

    /// Statistics for one term under the current document count
    pub fn term_stats(&self, term: &str) -> TermStats {
        match self.postings.get(term) {
            Some(docs) => {
                let document_count = docs.len() as u64;
                let idf = if document_count > 0 && self.doc_count > 0 {
                    (self.doc_count as f64 / document_count as f64).ln()
                } else {
                    0.0
                };
                TermStats {
                    term: term.to_string(),
                    document_count,
                    total_weight: docs.values().sum(),
                    idf,
                }
            }
            None => TermStats {
                term: term.to_string(),
                document_count: 0,
                total_weight: 0.0,
                idf: 0.0,
            },
        }
    }

    /// Whole-index statistics
    pub fn index_stats(&self) -> IndexStats {
        let total_postings = self.postings.values().map(|docs| docs.len() as u64).sum();
        let average_document_length = if self.doc_lengths.is_empty() {
            0.0
        } else {
            self.doc_lengths.values().sum::<u64>() as f64 / self.doc_lengths.len() as f64
        };

        IndexStats {
            total_documents: self.doc_count,
            total_terms: self.postings.len() as u64,
            total_postings,
            average_document_length,
        }
    }
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}
