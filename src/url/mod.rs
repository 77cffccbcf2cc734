//! URL handling module for Lantern
//!
//! This module provides the canonical URL form used for frontier identity,
//! plus host extraction and path depth helpers.

mod domain;
mod normalize;

pub use domain::{extract_host, path_depth};
pub use normalize::canonicalize_url;
