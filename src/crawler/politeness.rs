//! Per-host politeness gate
//!
//! Enforces a minimum interval between requests to the same host. The gate
//! hands out dispatch slots under a mutex and sleeps outside it, so
//! concurrent waiters for one host serialize at the configured spacing and
//! waiters for different hosts never block each other.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Per-host minimum-interval request gate
pub struct PolitenessGate {
    /// host -> instant of the most recently claimed dispatch slot
    last_dispatch: Mutex<HashMap<String, Instant>>,

    /// host -> robots-supplied delay overriding the default
    overrides: Mutex<HashMap<String, Duration>>,

    default_delay: Duration,
}

impl PolitenessGate {
    /// Creates a gate with the given default inter-request delay
    pub fn new(default_delay: Duration) -> Self {
        Self {
            last_dispatch: Mutex::new(HashMap::new()),
            overrides: Mutex::new(HashMap::new()),
            default_delay,
        }
    }

    /// Installs a robots-supplied crawl delay for one host
    pub fn set_host_delay(&self, host: &str, delay: Duration) {
        self.overrides
            .lock()
            .unwrap()
            .insert(host.to_string(), delay);
    }

    /// Returns the effective delay for a host
    pub fn delay_for(&self, host: &str) -> Duration {
        self.overrides
            .lock()
            .unwrap()
            .get(host)
            .copied()
            .unwrap_or(self.default_delay)
    }

    /// Waits until a request to the host is permitted
    ///
    /// Completes no earlier than the previous dispatch for this host plus
    /// the effective delay; the host's dispatch record is updated before
    /// waiting, so the interval holds under concurrent callers. A host with
    /// no prior record returns immediately.
    pub async fn wait(&self, host: &str) {
        let delay = self.delay_for(host);
        let scheduled = {
            let mut last = self.last_dispatch.lock().unwrap();
            let now = Instant::now();
            let scheduled = match last.get(host) {
                Some(prev) => {
                    let earliest = *prev + delay;
                    if earliest > now {
                        earliest
                    } else {
                        now
                    }
                }
                None => now,
            };
            last.insert(host.to_string(), scheduled);
            scheduled
        };

        tokio::time::sleep_until(scheduled).await;
    }
}
