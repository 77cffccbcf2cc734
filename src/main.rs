//! Lantern main entry point
//!
//! Command-line interface for the Lantern search engine: crawl the web into
//! a document store, build the search index from it, and serve queries.

use clap::{Parser, Subcommand};
use lantern::config::load_config;
use lantern::index::{build_index, InvertedIndex};
use lantern::search::SearchService;
use lantern::storage::SqliteStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Lantern: a small-scale web search engine
#[derive(Parser, Debug)]
#[command(name = "lantern")]
#[command(version)]
#[command(about = "A small-scale web search engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the web from seed URLs into the document store
    Crawl {
        /// Path to TOML configuration file
        #[arg(long, value_name = "PATH")]
        config: PathBuf,

        /// One or more seed URLs to start from
        #[arg(long, value_name = "URL", num_args = 1.., required = true)]
        seeds: Vec<String>,
    },

    /// Build the search index from the document store
    Index {
        /// Path to TOML configuration file
        #[arg(long, value_name = "PATH")]
        config: PathBuf,
    },

    /// Serve search queries over HTTP
    Serve {
        /// Path to TOML configuration file
        #[arg(long, value_name = "PATH")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl { config, seeds } => handle_crawl(&config, seeds).await,
        Command::Index { config } => handle_index(&config),
        Command::Serve { config } => handle_serve(&config).await,
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lantern=info,warn"),
            1 => EnvFilter::new("lantern=debug,info"),
            2 => EnvFilter::new("lantern=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the crawl subcommand
async fn handle_crawl(
    config_path: &Path,
    seeds: Vec<String>,
) -> anyhow::Result<()> {
    let config = load_config_or_die(config_path)?;

    let store = Arc::new(SqliteStore::open(Path::new(&config.storage.database_path))?);
    let report = lantern::crawler::crawl(&config.crawler, &seeds, store).await?;

    println!(
        "Crawl complete: {} pages stored ({} considered) in {:.1}s",
        report.pages_stored,
        report.pages_considered,
        report.elapsed.as_secs_f64()
    );

    Ok(())
}

/// Handles the index subcommand
fn handle_index(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config_or_die(config_path)?;

    let store = SqliteStore::open(Path::new(&config.storage.database_path))?;
    let index = build_index(&store)?;
    index.save(Path::new(&config.index.path))?;

    let stats = index.index_stats();
    println!(
        "Index built: {} documents, {} terms, {} postings -> {}",
        stats.total_documents, stats.total_terms, stats.total_postings, config.index.path
    );

    Ok(())
}

/// Handles the serve subcommand
async fn handle_serve(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config_or_die(config_path)?;

    let index_path = Path::new(&config.index.path);
    let index = if index_path.exists() {
        InvertedIndex::load(index_path)?
    } else {
        tracing::warn!(
            "No index file at {}; serving an empty index. Run `lantern index` first.",
            config.index.path
        );
        let mut empty = InvertedIndex::new();
        empty.finalize();
        empty
    };

    let store = Arc::new(SqliteStore::open(Path::new(&config.storage.database_path))?);
    let service = Arc::new(SearchService::new(index, store, &config.search));

    lantern::search::serve(service, &config.search.host, config.search.port).await?;

    Ok(())
}

/// Loads configuration, logging the failure before propagating it
fn load_config_or_die(path: &Path) -> anyhow::Result<lantern::Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    match load_config(path) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}
