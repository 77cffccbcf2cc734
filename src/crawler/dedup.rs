//! Content-based duplicate suppression
//!
//! Pages whose normalized text matches an already-seen fingerprint are
//! rejected. Normalization collapses whitespace and folds case, so
//! formatting-only differences do not defeat detection.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Mutex;

/// Detects exact duplicates of previously seen page text
pub struct DuplicateDetector {
    fingerprints: Mutex<HashSet<[u8; 32]>>,
}

impl DuplicateDetector {
    /// Creates an empty detector
    pub fn new() -> Self {
        Self {
            fingerprints: Mutex::new(HashSet::new()),
        }
    }

    /// Checks text against the fingerprint set, recording it on first sight
    ///
    /// Returns true when the normalized text was seen before.
    pub fn is_duplicate(&self, text: &str) -> bool {
        let digest = fingerprint(text);
        let fresh = self.fingerprints.lock().unwrap().insert(digest);
        if !fresh {
            tracing::debug!("Duplicate fingerprint {}", hex::encode(&digest[..8]));
        }
        !fresh
    }

    /// Number of distinct fingerprints recorded
    pub fn len(&self) -> usize {
        self.fingerprints.lock().unwrap().len()
    }

    /// Whether no fingerprint has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.fingerprints.lock().unwrap().is_empty()
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the fixed-width digest of normalized text
fn fingerprint(text: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    let mut pending_space = false;
    for word in text.split_whitespace() {
        if pending_space {
            hasher.update(b" ");
        }
        hasher.update(word.to_lowercase().as_bytes());
        pending_space = true;
    }
    hasher.finalize().into()
}
