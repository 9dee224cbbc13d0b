//! Magpie main entry point
//!
//! Command-line interface for the magpie page crawler and file harvester.

use clap::Parser;
use magpie::config::load_config_with_hash;
use magpie::crawler::{crawl, CrawlSummary};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Magpie: a configurable page crawler and file harvester
///
/// Magpie walks pages from the configured seeds, applies each extractor
/// rule to the pages it matches, downloads the matched files, and writes
/// scraped metadata alongside them.
#[derive(Parser, Debug)]
#[command(name = "magpie")]
#[command(version)]
#[command(about = "Crawl pages and harvest files by extractor rules", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Walk and extract without writing any files
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Seed pages: {}, extractors: {}",
        config.pages.len(),
        config.extractors.len()
    );

    if cli.dry_run {
        tracing::info!("Dry run: no files will be written");
    }

    let summary = crawl(config, cli.dry_run).await?;
    print_summary(&summary, cli.dry_run);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("magpie=info,warn"),
            1 => EnvFilter::new("magpie=debug,info"),
            2 => EnvFilter::new("magpie=trace,debug"),
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

/// Prints the end-of-run summary
fn print_summary(summary: &CrawlSummary, dry_run: bool) {
    println!("=== Crawl Summary ===\n");

    println!("Pages:");
    println!("  Visited:   {}", summary.pages_visited);
    println!("  Failed:    {}", summary.pages_failed);
    println!("  Revisits:  {}", summary.pages_skipped);
    println!("  Unmatched: {}", summary.pages_unmatched);
    println!();

    println!("Files:");
    if dry_run {
        println!("  Would download: {}", summary.files_skipped_dryrun);
    } else {
        println!("  Saved:            {}", summary.files_saved);
        println!("  Already present:  {}", summary.files_skipped_existing);
        println!("  Below min-size:   {}", summary.files_skipped_small);
        println!("  Failed:           {}", summary.files_failed);
    }
}
