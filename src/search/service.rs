//! Search service: query strings in, ranked result records out
//!
//! Composes the finalized index and the document store. Queries are
//! tokenized with the same function the index builder used, over-fetched
//! from the index to leave room for metadata filtering, paginated, and
//! hydrated into records with snippets.

use crate::config::SearchConfig;
use crate::index::{IndexStats, InvertedIndex};
use crate::storage::DocumentStore;
use crate::text::tokenize;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// One ranked search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub score: f64,
}

/// A complete search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    pub page: usize,
    pub results: Vec<SearchHit>,
    /// Seconds spent answering, rounded to milliseconds
    pub processing_time: f64,
}

/// Ranked retrieval over a finalized index and a document store
pub struct SearchService {
    index: InvertedIndex,
    store: Arc<dyn DocumentStore>,
    snippet_length: usize,
    overfetch_factor: usize,
}

impl SearchService {
    /// Creates a service over a finalized index
    pub fn new(index: InvertedIndex, store: Arc<dyn DocumentStore>, config: &SearchConfig) -> Self {
        Self {
            index,
            store,
            snippet_length: config.snippet_length,
            overfetch_factor: config.overfetch_factor,
        }
    }

    /// Answers a query
    ///
    /// `page` is 1-based. The index is asked for `limit * overfetch_factor`
    /// hits so that documents missing from the store can be skipped without
    /// starving the requested page.
    pub fn search(&self, query: &str, page: usize, limit: usize) -> crate::Result<SearchResponse> {
        let started = Instant::now();
        let page = page.max(1);

        let terms = tokenize(query);
        if terms.is_empty() {
            return Ok(SearchResponse {
                query: query.to_string(),
                total_results: 0,
                page,
                results: Vec::new(),
                processing_time: 0.0,
            });
        }

        let hits = self.index.search(&terms, limit * self.overfetch_factor)?;
        let total_results = hits.len();

        let mut results = Vec::new();
        for (doc_id, score) in hits.into_iter().skip((page - 1) * limit).take(limit) {
            let Some(doc) = self.store.get_info(doc_id)? else {
                tracing::debug!("Document {} missing from store, skipping", doc_id);
                continue;
            };

            results.push(SearchHit {
                title: if doc.title.is_empty() {
                    "Untitled".to_string()
                } else {
                    doc.title
                },
                url: doc.url,
                snippet: generate_snippet(&doc.content, &terms, self.snippet_length),
                score: round_to(score, 4),
            });
        }

        Ok(SearchResponse {
            query: query.to_string(),
            total_results,
            page,
            results,
            processing_time: round_to(started.elapsed().as_secs_f64(), 3),
        })
    }

    /// Statistics of the underlying index
    pub fn stats(&self) -> IndexStats {
        self.index.index_stats()
    }

    /// Whether a non-empty index is loaded
    pub fn is_loaded(&self) -> bool {
        self.index.doc_count() > 0
    }
}

/// Builds a snippet around the earliest query-term occurrence
///
/// The window is up to `max_length` bytes centered on the first
/// case-insensitive match of any term, snapped to character boundaries,
/// with ellipses marking truncation on either side. When no term occurs,
/// the content prefix is returned.
pub fn generate_snippet(content: &str, terms: &[String], max_length: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    let content_lower = content.to_lowercase();
    let first_match = terms
        .iter()
        .filter_map(|term| content_lower.find(&term.to_lowercase()))
        .min();

    let Some(pos) = first_match else {
        return prefix_snippet(content, max_length);
    };

    let mut start = pos.saturating_sub(max_length / 2).min(content.len());
    while !content.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (start + max_length).min(content.len());
    while !content.is_char_boundary(end) {
        end -= 1;
    }

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&content[start..end]);
    if end < content.len() {
        snippet.push_str("...");
    }
    snippet
}

/// Content prefix with a trailing ellipsis when truncated
fn prefix_snippet(content: &str, max_length: usize) -> String {
    if content.len() <= max_length {
        return content.to_string();
    }
    let mut end = max_length;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &content[..end])
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
