//! Sitesift main entry point
//!
//! This is the command-line interface for the Sitesift crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sitesift::config::{load_config_with_hash, validate, Config};
use sitesift::crawler::crawl;
use sitesift::output::{generate_markdown_summary, print_statistics, JsonIndexWriter};
use tracing_subscriber::EnvFilter;

/// Sitesift: A polite site crawler for client-side search indexes
///
/// Sitesift crawls a site from its seed URLs while respecting robots.txt,
/// per-host rate limits and page/depth limits, and writes a JSON index that
/// a client-side full-text search library can load directly.
#[derive(Parser, Debug)]
#[command(name = "sitesift")]
#[command(version)]
#[command(about = "A polite site crawler for client-side search indexes", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Write the index to this path instead of the configured one
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Restrict the crawl to this exact host
    #[arg(long, value_name = "HOST")]
    scope_domain: Option<String>,

    /// Stop after this many pages have been visited
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output.index_path = output.display().to_string();
        }
        if let Some(domain) = &self.scope_domain {
            config.crawler.scope_domain = Some(domain.clone());
        }
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, &config_hash, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitesift=info,warn"),
            1 => EnvFilter::new("sitesift=debug,info"),
            2 => EnvFilter::new("sitesift=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sitesift Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!(
        "  Minimum host delay: {}s",
        config.crawler.min_host_delay_seconds
    );
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_seconds
    );
    println!(
        "  Respect Crawl-delay: {}",
        config.crawler.respect_crawl_delay
    );
    println!(
        "  Scope domain: {}",
        config.crawler.scope_domain.as_deref().unwrap_or("(any)")
    );
    println!(
        "  Ignored extensions: {}",
        config.crawler.ignored_extensions.join(" ")
    );

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());
    println!("  Robots token: {}", config.user_agent.agent_token());

    println!("\nOutput:");
    println!("  Index: {}", config.output.index_path);
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }
    println!("  Snippet length: {}", config.extract.snippet_length);

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
///
/// A failure to write the index is fatal; a failure to write the optional
/// summary is only logged.
async fn handle_crawl(config: Config, config_hash: &str, quiet: bool) -> anyhow::Result<()> {
    let index_path = PathBuf::from(&config.output.index_path);
    let summary_path = config.output.summary_path.clone();

    let report = crawl(config).await.context("Crawl failed")?;

    let writer = JsonIndexWriter::new(&index_path);
    if let Err(e) = report.write_index(&writer) {
        tracing::error!("Could not write index to {}: {}", index_path.display(), e);
        return Err(e).with_context(|| format!("Failed to write {}", index_path.display()));
    }
    tracing::info!(
        "Index with {} records written to {}",
        report.records().len(),
        index_path.display()
    );

    if let Some(summary_path) = summary_path {
        let path = Path::new(&summary_path);
        match generate_markdown_summary(&report.statistics, config_hash, path) {
            Ok(()) => tracing::info!("Summary written to {}", path.display()),
            Err(e) => tracing::warn!("Could not write summary to {}: {}", path.display(), e),
        }
    }

    if !quiet {
        println!();
        print_statistics(&report.statistics);
    }

    Ok(())
}
