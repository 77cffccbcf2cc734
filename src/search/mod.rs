//! Search module: ranked retrieval and its HTTP surface

mod server;
mod service;

pub use server::{router, serve};
pub use service::{generate_snippet, SearchHit, SearchResponse, SearchService};
