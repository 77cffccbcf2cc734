//! Inverted index module
//!
//! The TF-IDF posting map, its binary persistence, and the offline pass
//! that builds it from the document store.

mod builder;
mod inverted;
mod persist;

pub use builder::build_index;
pub use inverted::{DocId, IndexError, IndexStats, InvertedIndex, Phase, TermStats};
