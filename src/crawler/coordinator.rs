//! Crawl coordinator: the worker pool and per-item pipeline
//!
//! Runs N workers over the shared frontier. Each work item flows through
//! frontier -> crawled-set -> robots -> politeness -> fetch -> content
//! gates -> parse -> dedup -> store -> link expansion. The crawl ends when
//! the page budget is reached or when the frontier stays empty for a
//! configurable number of polls.

use crate::config::CrawlerConfig;
use crate::crawler::dedup::DuplicateDetector;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::UrlFrontier;
use crate::crawler::parser::parse_html;
use crate::crawler::politeness::PolitenessGate;
use crate::robots::RobotsPolicy;
use crate::storage::{DocumentRecord, DocumentStore};
use crate::url::{canonicalize_url, extract_host, path_depth};
use crate::Result;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use url::Url;

/// Priority given to seed URLs
const SEED_PRIORITY: f64 = 1.0;

/// Final counts reported by a completed crawl
#[derive(Debug)]
pub struct CrawlReport {
    /// Pages handed to the document store
    pub pages_stored: u64,

    /// URLs popped from the frontier (including rejected ones)
    pub pages_considered: u64,

    /// URLs still queued when the crawl ended
    pub frontier_remaining: usize,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

/// Shared state for one crawl run
struct CrawlContext {
    frontier: UrlFrontier,
    gate: PolitenessGate,
    robots: RobotsPolicy,
    dedup: DuplicateDetector,
    fetcher: Fetcher,
    store: Arc<dyn DocumentStore>,
    crawled: Mutex<HashSet<String>>,
    pages_stored: AtomicU64,
    pages_considered: AtomicU64,
    next_doc_id: AtomicU64,
    shutdown_tx: watch::Sender<bool>,
    config: CrawlerConfig,
}

/// Runs a complete crawl from the given seed URLs
///
/// Spawns `crawler.max_threads` workers over a shared frontier and waits
/// for all of them to unwind. Returns the final counts; errors inside the
/// worker loops are logged, never propagated.
///
/// # Arguments
///
/// * `config` - Crawler configuration
/// * `seeds` - Seed URLs (must be valid http/https URLs)
/// * `store` - Destination for accepted pages
pub async fn crawl(
    config: &CrawlerConfig,
    seeds: &[String],
    store: Arc<dyn DocumentStore>,
) -> Result<CrawlReport> {
    let started = Instant::now();

    let fetcher = Fetcher::new(
        &config.user_agent,
        Duration::from_secs(config.timeout),
        config.max_connections,
    )?;
    let robots = RobotsPolicy::new(
        fetcher.client(),
        Duration::from_secs(config.robots_ttl_secs),
    );
    let next_doc_id = store.max_doc_id()? + 1;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let ctx = Arc::new(CrawlContext {
        frontier: UrlFrontier::new(config.max_queue_size),
        gate: PolitenessGate::new(Duration::from_millis(config.delay_ms)),
        robots,
        dedup: DuplicateDetector::new(),
        fetcher,
        store,
        crawled: Mutex::new(HashSet::new()),
        pages_stored: AtomicU64::new(0),
        pages_considered: AtomicU64::new(0),
        next_doc_id: AtomicU64::new(next_doc_id),
        shutdown_tx,
        config: config.clone(),
    });

    for seed in seeds {
        let canonical = canonicalize_url(seed)?;
        ctx.frontier.add(canonical.as_str(), SEED_PRIORITY);
    }
    tracing::info!("Starting crawl with {} seed URLs", seeds.len());

    let mut handles = Vec::with_capacity(config.max_threads);
    for worker_id in 0..config.max_threads {
        let ctx = ctx.clone();
        let shutdown_rx = shutdown_rx.clone();
        handles.push(tokio::spawn(worker(ctx, shutdown_rx, worker_id)));
    }

    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!("Worker task panicked: {}", e);
        }
    }

    let report = CrawlReport {
        pages_stored: ctx.pages_stored.load(Ordering::SeqCst),
        pages_considered: ctx.pages_considered.load(Ordering::SeqCst),
        frontier_remaining: ctx.frontier.len(),
        elapsed: started.elapsed(),
    };
    tracing::info!(
        "Crawl finished: {} pages stored, {} considered, {} still queued, {:.1}s",
        report.pages_stored,
        report.pages_considered,
        report.frontier_remaining,
        report.elapsed.as_secs_f64()
    );

    Ok(report)
}

/// One crawl worker: pops URLs until shut down or the frontier stays dry
async fn worker(ctx: Arc<CrawlContext>, mut shutdown: watch::Receiver<bool>, worker_id: usize) {
    tracing::debug!("Worker {} starting", worker_id);
    let mut empty_polls = 0u32;

    loop {
        if *shutdown.borrow() {
            break;
        }

        let Some((url, _priority)) = ctx.frontier.next() else {
            empty_polls += 1;
            if empty_polls >= ctx.config.empty_poll_limit {
                tracing::debug!(
                    "Worker {} exiting after {} empty polls",
                    worker_id,
                    empty_polls
                );
                break;
            }
            tokio::select! {
                _ = shutdown.changed() => {}
                _ = tokio::time::sleep(Duration::from_millis(ctx.config.backoff_ms)) => {}
            }
            continue;
        };
        empty_polls = 0;

        if let Err(e) = process_url(&ctx, &mut shutdown, &url).await {
            tracing::error!("Worker {} error on {}: {}", worker_id, url, e);
        }
    }

    tracing::debug!("Worker {} stopped", worker_id);
}

/// Runs one URL through the crawl pipeline
async fn process_url(
    ctx: &CrawlContext,
    shutdown: &mut watch::Receiver<bool>,
    url_str: &str,
) -> Result<()> {
    ctx.pages_considered.fetch_add(1, Ordering::SeqCst);

    {
        let mut crawled = ctx.crawled.lock().unwrap();
        if !crawled.insert(url_str.to_string()) {
            return Ok(());
        }
    }

    let url = Url::parse(url_str)?;
    let Some(host) = extract_host(&url) else {
        return Ok(());
    };

    if !ctx.robots.may_fetch(&url, &ctx.config.user_agent).await {
        tracing::debug!("Robots denied: {}", url);
        return Ok(());
    }

    if let Some(delay) = ctx.robots.crawl_delay(&host, &ctx.config.user_agent) {
        ctx.gate.set_host_delay(&host, delay);
    }

    tokio::select! {
        _ = shutdown.changed() => return Ok(()),
        _ = ctx.gate.wait(&host) => {}
    }

    let page = match ctx.fetcher.get(url.as_str()).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Fetch failed: {}", e);
            return Ok(());
        }
    };

    if page.status != 200 {
        tracing::debug!("Dropping {} (status {})", url, page.status);
        return Ok(());
    }

    if !page.content_type.starts_with("text/html") {
        tracing::debug!("Dropping {} (content-type {:?})", url, page.content_type);
        return Ok(());
    }

    let parsed = parse_html(&page.body, &url);
    if parsed.text.is_empty() {
        tracing::debug!("Dropping {} (no text content)", url);
        return Ok(());
    }

    if ctx.dedup.is_duplicate(&parsed.text) {
        tracing::debug!("Duplicate content: {}", url);
        return Ok(());
    }

    // Claim a budget slot before storing so the budget is never exceeded
    let slot = ctx.pages_stored.fetch_add(1, Ordering::SeqCst) + 1;
    if slot > ctx.config.max_pages {
        ctx.pages_stored.fetch_sub(1, Ordering::SeqCst);
        let _ = ctx.shutdown_tx.send(true);
        return Ok(());
    }

    let doc_id = ctx.next_doc_id.fetch_add(1, Ordering::SeqCst);
    if let Err(e) = ctx.store.put(&DocumentRecord {
        doc_id,
        url: url.to_string(),
        title: parsed.title.unwrap_or_default(),
        content: parsed.text,
        content_type: page.content_type,
        fetched_at: Utc::now(),
    }) {
        ctx.pages_stored.fetch_sub(1, Ordering::SeqCst);
        return Err(e.into());
    }

    tracing::info!("Crawled ({}): {}", slot, url);
    if slot >= ctx.config.max_pages {
        // Budget reached: workers stop dequeueing and unwind
        let _ = ctx.shutdown_tx.send(true);
    }

    for link in &parsed.links {
        match canonicalize_url(link) {
            Ok(canonical) => {
                let priority = link_priority(&canonical, &url);
                ctx.frontier.add(canonical.as_str(), priority);
            }
            Err(e) => {
                tracing::trace!("Skipping link {}: {}", link, e);
            }
        }
    }

    Ok(())
}

/// Computes the crawl priority for a discovered link
///
/// Starts at 0.5, adds 0.2 when the link stays on the referring page's
/// host, subtracts 0.05 per non-empty path segment, and clamps to
/// [0.0, 1.0].
pub fn link_priority(link: &Url, referrer: &Url) -> f64 {
    let mut priority = 0.5;

    let link_host = extract_host(link);
    if link_host.is_some() && link_host == extract_host(referrer) {
        priority += 0.2;
    }

    priority -= 0.05 * path_depth(link) as f64;

    priority.clamp(0.0, 1.0)
}
