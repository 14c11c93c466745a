//! Crawler coordinator - main crawl orchestration logic
//!
//! This module owns the engine state of one run and coordinates:
//! - Normalizing and scope-checking the seeds
//! - Driving the scheduler until the run ends
//! - Collecting the produced records and final statistics

use crate::config::Config;
use crate::crawler::context::CrawlContext;
use crate::crawler::frontier::FrontierEntry;
use crate::crawler::scheduler::{Scheduler, StopReason};
use crate::crawler::{Fetcher, HttpFetcher};
use crate::output::{CrawlStatistics, IndexSink, IndexWriter, OutputResult, PageRecord};
use crate::url::normalize_url;
use crate::SiftError;
use std::time::Duration;

/// Everything a finished run produced
#[derive(Debug)]
pub struct CrawlReport {
    pub sink: IndexSink,
    pub statistics: CrawlStatistics,
    pub stop_reason: StopReason,
}

impl CrawlReport {
    /// Indexed records in the order they were produced
    pub fn records(&self) -> &[PageRecord] {
        self.sink.records()
    }

    /// Persists the records through `writer`
    pub fn write_index(&self, writer: &dyn IndexWriter) -> OutputResult<usize> {
        self.sink.flush(writer)
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<F> {
    config: Config,
    ctx: CrawlContext<F>,
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator for one run using `fetcher` for all requests
    pub fn new(config: Config, fetcher: F) -> Self {
        let ctx = CrawlContext::new(&config, fetcher);
        Self { config, ctx }
    }

    /// Queues the configured seeds at depth 0
    ///
    /// Seeds that fail to normalize or fall outside the scope are skipped with
    /// a warning. Returns the number of seeds queued.
    pub fn seed(&self) -> usize {
        let mut queued = 0;

        for seed in &self.config.crawler.seeds {
            let url = match normalize_url(seed) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping seed {}: {}", seed, e);
                    continue;
                }
            };

            if !self.ctx.scope.allows(&url) {
                tracing::warn!("Skipping seed {}: outside crawl scope", url);
                continue;
            }

            if self.ctx.state().frontier.push(FrontierEntry::new(url, 0)) {
                queued += 1;
            }
        }

        queued
    }

    /// Runs the crawl to completion
    pub async fn run(self) -> CrawlReport {
        let seeds = self.seed();
        tracing::info!(
            "Starting crawl with {} seed(s), max {} pages, max depth {}",
            seeds,
            self.ctx.limits.max_pages,
            self.ctx.limits.max_depth
        );

        let mut sink = IndexSink::new();
        let mut statistics = CrawlStatistics::new();

        let stop_reason = Scheduler::new(&self.ctx, self.config.crawler.concurrency)
            .run(&mut sink, &mut statistics)
            .await;

        let (visited, remaining) = {
            let state = self.ctx.state();
            (state.visited.len(), state.frontier.len())
        };
        statistics.finish(visited, remaining, self.ctx.politeness.host_count());

        tracing::info!(
            "Crawl finished ({:?}): {} pages visited, {} indexed",
            stop_reason,
            visited,
            sink.len()
        );

        CrawlReport {
            sink,
            statistics,
            stop_reason,
        }
    }
}

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the user agent configuration
/// 2. Seed the frontier
/// 3. Fetch, extract and follow links until a limit is hit
///
/// Persisting the records is left to the caller.
pub async fn crawl(config: Config) -> Result<CrawlReport, SiftError> {
    let timeout = Duration::from_secs(config.crawler.request_timeout_seconds);
    let fetcher = HttpFetcher::new(&config.user_agent, timeout)?;
    Ok(Coordinator::new(config, fetcher).run().await)
}
