//! Per-host robots.txt policy with caching
//!
//! Answers "may this user agent fetch this URL?" and caches one parsed
//! robots.txt record per host. The upstream fetch happens outside any lock;
//! a per-host in-flight marker keeps concurrent misses from fetching twice.

use crate::robots::ParsedRobots;
use crate::url::extract_host;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// How long a 5xx-derived deny-all record stays cached
const ERROR_TTL: Duration = Duration::from_secs(3600);

/// How long a miss waits before re-checking an in-flight fetch
const IN_FLIGHT_POLL: Duration = Duration::from_millis(50);

/// Cached robots.txt record for one host
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt rules
    pub rules: ParsedRobots,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,

    /// Lifetime of this record
    pub ttl: Duration,
}

impl CachedRobots {
    /// Creates a record stamped with the current time
    pub fn new(rules: ParsedRobots, ttl: Duration) -> Self {
        Self {
            rules,
            fetched_at: Utc::now(),
            ttl,
        }
    }

    /// Checks whether this record has outlived its TTL
    pub fn is_stale(&self) -> bool {
        let age = Utc::now() - self.fetched_at;
        age.to_std().map(|age| age > self.ttl).unwrap_or(true)
    }
}

/// Robots.txt policy: per-host fetch, parse, cache, and allow/deny queries
pub struct RobotsPolicy {
    cache: Mutex<HashMap<String, CachedRobots>>,
    in_flight: Mutex<HashSet<String>>,
    client: Client,
    ttl: Duration,
}

impl RobotsPolicy {
    /// Creates a new policy
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for robots.txt fetches
    /// * `ttl` - Lifetime of cached records
    pub fn new(client: Client, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
            client,
            ttl,
        }
    }

    /// Checks whether the user agent may fetch the URL
    ///
    /// Fetches and caches `<origin>/robots.txt` on a cache miss. Fetch
    /// failures and 4xx responses default to allow; 5xx defaults to deny
    /// with a short-lived cache entry.
    pub async fn may_fetch(&self, url: &Url, user_agent: &str) -> bool {
        let Some(host) = extract_host(url) else {
            return false;
        };

        loop {
            if let Some(verdict) = self.cached_verdict(&host, url, user_agent) {
                return verdict;
            }

            let claimed = {
                let mut in_flight = self.in_flight.lock().unwrap();
                in_flight.insert(host.clone())
            };
            if claimed {
                break;
            }

            // Another worker is fetching this host's robots.txt
            tokio::time::sleep(IN_FLIGHT_POLL).await;
        }

        let record = self.fetch_robots(url, &host).await;
        let verdict = record.rules.is_allowed(url.as_str(), user_agent);

        self.cache.lock().unwrap().insert(host.clone(), record);
        self.in_flight.lock().unwrap().remove(&host);

        verdict
    }

    /// Returns the robots-supplied crawl delay for a host, if cached
    pub fn crawl_delay(&self, host: &str, user_agent: &str) -> Option<Duration> {
        let cache = self.cache.lock().unwrap();
        let entry = cache.get(host)?;
        entry
            .rules
            .crawl_delay(user_agent)
            .map(Duration::from_secs_f64)
    }

    /// Evaluates a fresh cached record, if one exists
    fn cached_verdict(&self, host: &str, url: &Url, user_agent: &str) -> Option<bool> {
        let cache = self.cache.lock().unwrap();
        let entry = cache.get(host)?;
        if entry.is_stale() {
            return None;
        }
        Some(entry.rules.is_allowed(url.as_str(), user_agent))
    }

    /// Fetches and classifies robots.txt for a host (no locks held)
    async fn fetch_robots(&self, url: &Url, host: &str) -> CachedRobots {
        let robots_url = match url.join("/robots.txt") {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!("Cannot build robots.txt URL for {}: {}", host, e);
                return CachedRobots::new(ParsedRobots::allow_all(), self.ttl);
            }
        };

        match self.client.get(robots_url.as_str()).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    match response.text().await {
                        Ok(body) => {
                            tracing::debug!("Fetched robots.txt for {}", host);
                            CachedRobots::new(ParsedRobots::from_content(&body), self.ttl)
                        }
                        Err(e) => {
                            tracing::debug!("robots.txt body error for {}: {}", host, e);
                            CachedRobots::new(ParsedRobots::allow_all(), self.ttl)
                        }
                    }
                } else if status.is_server_error() {
                    tracing::debug!("robots.txt {} for {}, denying host", status, host);
                    CachedRobots::new(ParsedRobots::deny_all(), ERROR_TTL)
                } else {
                    tracing::debug!("robots.txt {} for {}, allowing host", status, host);
                    CachedRobots::new(ParsedRobots::allow_all(), self.ttl)
                }
            }
            Err(e) => {
                tracing::debug!("robots.txt fetch failed for {}: {}", host, e);
                CachedRobots::new(ParsedRobots::allow_all(), self.ttl)
            }
        }
    }
}
