//! HTTP fetcher
//!
//! Performs the crawler's GET requests with bounded parallelism, a total
//! per-request timeout, keep-alive connection pooling, and a fixed redirect
//! limit. Status and content-type are surfaced verbatim; the coordinator
//! decides what to keep.

use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 5;

/// A completed HTTP exchange
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, verbatim (empty if absent)
    pub content_type: String,

    /// Response body
    pub body: String,
}

/// Categorized fetch failures
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },
}

/// Bounded-parallelism HTTP GET client
pub struct Fetcher {
    client: Client,
    permits: Arc<Semaphore>,
}

impl Fetcher {
    /// Builds a fetcher
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Sent on every request
    /// * `timeout` - Total per-request timeout, redirects included
    /// * `max_connections` - Cap on simultaneous in-flight requests
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        max_connections: usize,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(max_connections)),
        })
    }

    /// The underlying HTTP client (shared with the robots policy)
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Fetches a URL
    ///
    /// Acquires a global permit first, so at most `max_connections`
    /// requests are in flight at once. Every completed HTTP exchange is
    /// returned as `FetchedPage` regardless of status; failures are
    /// classified as timeout, redirect-limit, or network errors.
    pub async fn get(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("fetch semaphore closed");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Err(classify(url, e)),
        };

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Err(classify(url, e)),
        };

        Ok(FetchedPage {
            final_url,
            status,
            content_type,
            body,
        })
    }
}

/// Maps a reqwest error to a fetch error kind
fn classify(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_redirect() {
        FetchError::RedirectLimit {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: e,
        }
    }
}
