//! URL frontier: the bounded priority queue feeding crawl workers
//!
//! URLs come out in descending priority order with ties broken by
//! discovery order. A global seen-set admits each URL at most once across
//! the frontier's lifetime. All operations run under one mutex and never
//! perform I/O.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Mutex;

/// A URL queued for fetching with priority information
#[derive(Debug, Clone)]
struct QueuedUrl {
    url: String,

    /// Priority in [0.0, 1.0]; higher is fetched first
    priority: f64,

    /// Discovery sequence number; lower breaks priority ties
    seq: u64,
}

impl Ord for QueuedUrl {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on priority; earlier discovery wins ties
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedUrl {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedUrl {}

struct FrontierInner {
    heap: BinaryHeap<QueuedUrl>,
    seen: HashSet<String>,
    next_seq: u64,
    capacity_warned: bool,
}

/// Bounded priority frontier with global URL de-duplication
pub struct UrlFrontier {
    inner: Mutex<FrontierInner>,
    capacity: usize,
}

impl UrlFrontier {
    /// Creates a frontier with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(FrontierInner {
                heap: BinaryHeap::new(),
                seen: HashSet::new(),
                next_seq: 0,
                capacity_warned: false,
            }),
            capacity,
        }
    }

    /// Offers a URL to the frontier
    ///
    /// Returns false if the URL was offered before (at any priority) or if
    /// the queue is full. A capacity rejection does not mark the URL seen,
    /// so it may be offered again once the queue drains.
    pub fn add(&self, url: &str, priority: f64) -> bool {
        let mut inner = self.inner.lock().unwrap();

        if inner.seen.contains(url) {
            return false;
        }

        if inner.heap.len() >= self.capacity {
            if !inner.capacity_warned {
                inner.capacity_warned = true;
                tracing::warn!("URL frontier at capacity ({}), dropping links", self.capacity);
            }
            return false;
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.seen.insert(url.to_string());
        inner.heap.push(QueuedUrl {
            url: url.to_string(),
            priority,
            seq,
        });

        true
    }

    /// Pops the highest-priority URL, if any
    ///
    /// Never blocks; an empty frontier returns None immediately.
    pub fn next(&self) -> Option<(String, f64)> {
        let mut inner = self.inner.lock().unwrap();
        let item = inner.heap.pop()?;
        if inner.heap.len() < self.capacity {
            inner.capacity_warned = false;
        }
        Some((item.url, item.priority))
    }

    /// Number of URLs currently queued
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().heap.len()
    }

    /// Whether the queue is currently empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        let frontier = UrlFrontier::new(100);
        assert!(frontier.add("https://a.com/", 0.3));
        assert!(frontier.add("https://b.com/", 0.9));
        assert!(frontier.add("https://c.com/", 0.6));

        assert_eq!(frontier.next(), Some(("https://b.com/".to_string(), 0.9)));
        assert_eq!(frontier.next(), Some(("https://c.com/".to_string(), 0.6)));
        assert_eq!(frontier.next(), Some(("https://a.com/".to_string(), 0.3)));
        assert_eq!(frontier.next(), None);
    }

    #[test]
    fn test_duplicate_rejected() {
        let frontier = UrlFrontier::new(100);
        assert!(frontier.add("https://u.com/", 0.5));
        assert!(!frontier.add("https://u.com/", 0.9));
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.next(), Some(("https://u.com/".to_string(), 0.5)));
    }

    #[test]
    fn test_duplicate_rejected_after_pop() {
        let frontier = UrlFrontier::new(100);
        assert!(frontier.add("https://u.com/", 0.5));
        frontier.next();
        // Seen across the frontier's lifetime, not just while queued
        assert!(!frontier.add("https://u.com/", 0.5));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_ties_broken_by_discovery_order() {
        let frontier = UrlFrontier::new(100);
        frontier.add("https://first.com/", 0.5);
        frontier.add("https://second.com/", 0.5);
        frontier.add("https://third.com/", 0.5);

        assert_eq!(frontier.next().unwrap().0, "https://first.com/");
        assert_eq!(frontier.next().unwrap().0, "https://second.com/");
        assert_eq!(frontier.next().unwrap().0, "https://third.com/");
    }

    #[test]
    fn test_capacity_rejection() {
        let frontier = UrlFrontier::new(2);
        assert!(frontier.add("https://a.com/", 0.5));
        assert!(frontier.add("https://b.com/", 0.5));
        assert!(!frontier.add("https://c.com/", 0.9));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_capacity_rejection_allows_retry_after_drain() {
        let frontier = UrlFrontier::new(1);
        assert!(frontier.add("https://a.com/", 0.5));
        assert!(!frontier.add("https://c.com/", 0.9));
        frontier.next();
        // Rejected-for-capacity URL was not marked seen
        assert!(frontier.add("https://c.com/", 0.9));
    }

    #[test]
    fn test_pop_order_is_non_increasing() {
        let frontier = UrlFrontier::new(100);
        let priorities = [0.1, 0.9, 0.4, 0.7, 0.2, 1.0, 0.0, 0.55];
        for (i, p) in priorities.iter().enumerate() {
            frontier.add(&format!("https://site{}.com/", i), *p);
        }

        let mut last = f64::INFINITY;
        while let Some((_, p)) = frontier.next() {
            assert!(p <= last);
            last = p;
        }
    }

    #[test]
    fn test_empty_observers() {
        let frontier = UrlFrontier::new(10);
        assert!(frontier.is_empty());
        assert_eq!(frontier.len(), 0);
        frontier.add("https://a.com/", 0.5);
        assert!(!frontier.is_empty());
        assert_eq!(frontier.len(), 1);
    }
}
