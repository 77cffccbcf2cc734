use serde::Deserialize;

/// Main configuration structure for Lantern
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub storage: StorageConfig,
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Frontier capacity (pending URLs)
    pub max_queue_size: usize,

    /// Maximum number of simultaneous in-flight HTTP requests
    pub max_connections: usize,

    /// Per-request total timeout in seconds
    pub timeout: u64,

    /// Number of crawl workers
    pub max_threads: usize,

    /// Global page budget: the crawl stops once this many pages are stored
    pub max_pages: u64,

    /// Default minimum interval between requests to the same host (milliseconds)
    pub delay_ms: u64,

    /// User agent sent in HTTP headers and matched against robots.txt
    pub user_agent: String,

    /// Consecutive empty frontier polls before a worker exits
    #[serde(default = "default_empty_poll_limit")]
    pub empty_poll_limit: u32,

    /// Sleep between empty frontier polls (milliseconds)
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Lifetime of cached robots.txt entries (seconds)
    #[serde(default = "default_robots_ttl_secs")]
    pub robots_ttl_secs: u64,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

/// Index persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Path of the serialized index file
    pub path: String,
}

/// Search service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Bind address for the HTTP surface
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port for the HTTP surface
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum snippet length in characters
    #[serde(default = "default_snippet_length")]
    pub snippet_length: usize,

    /// How many times `limit` to over-fetch from the index before pagination
    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            snippet_length: default_snippet_length(),
            overfetch_factor: default_overfetch_factor(),
        }
    }
}

fn default_empty_poll_limit() -> u32 {
    5
}

fn default_backoff_ms() -> u64 {
    500
}

fn default_robots_ttl_secs() -> u64 {
    86_400
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_snippet_length() -> usize {
    160
}

fn default_overfetch_factor() -> usize {
    5
}
