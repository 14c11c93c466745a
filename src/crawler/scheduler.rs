//! Scheduler for draining the frontier in bounded-concurrency waves
//!
//! This module handles:
//! - Pulling batches of up to `concurrency` entries from the frontier
//! - Running the pipelines of a batch concurrently
//! - Merging discovered entries back into the frontier
//! - Stopping at the page limit or when the frontier is empty

use crate::crawler::context::{CrawlContext, CrawlState};
use crate::crawler::frontier::FrontierEntry;
use crate::crawler::pipeline::{process, PipelineResult};
use crate::crawler::Fetcher;
use crate::output::{CrawlStatistics, IndexSink};
use futures::stream::{self, StreamExt};

/// Processed URLs between two progress log lines
pub const PROGRESS_INTERVAL: u64 = 10;

/// Why a scheduler run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    FrontierExhausted,
    PageLimitReached,
}

/// Scheduler drives the frontier through the crawl pipeline
///
/// Each wave takes up to `concurrency` entries. Their pipelines run
/// interleaved on the current task; results are handled in dequeue order
/// once the whole wave has finished.
pub struct Scheduler<'a, F> {
    ctx: &'a CrawlContext<F>,
    concurrency: usize,
    waves: u64,
}

impl<'a, F: Fetcher> Scheduler<'a, F> {
    /// Creates a new scheduler
    ///
    /// A concurrency of zero is treated as one.
    pub fn new(ctx: &'a CrawlContext<F>, concurrency: usize) -> Self {
        Self {
            ctx,
            concurrency: concurrency.max(1),
            waves: 0,
        }
    }

    /// Number of waves run so far
    pub fn waves(&self) -> u64 {
        self.waves
    }

    /// Runs waves until the frontier is empty or the page limit is reached
    pub async fn run(&mut self, sink: &mut IndexSink, stats: &mut CrawlStatistics) -> StopReason {
        loop {
            let batch = match self.next_batch() {
                Ok(batch) => batch,
                Err(reason) => return reason,
            };

            self.waves += 1;
            tracing::debug!("Wave {}: {} URLs", self.waves, batch.len());

            let results = self.run_wave(batch).await;

            let mut discovered = Vec::new();
            for mut result in results {
                stats.record(&result);
                if let Some(record) = result.record.take() {
                    sink.push(record);
                }
                discovered.append(&mut result.discovered);
                self.log_progress(stats);
            }

            let added = self.merge(discovered);
            tracing::debug!("Wave {} queued {} new URLs", self.waves, added);
        }
    }

    /// Takes the next batch, or says why there is none
    fn next_batch(&self) -> Result<Vec<FrontierEntry>, StopReason> {
        let mut state = self.ctx.state();

        if state.visited.len() >= self.ctx.limits.max_pages {
            tracing::info!(
                "Reached max pages limit ({}); stopping crawl",
                self.ctx.limits.max_pages
            );
            return Err(StopReason::PageLimitReached);
        }

        if state.frontier.is_empty() {
            return Err(StopReason::FrontierExhausted);
        }

        Ok(state.frontier.take_batch(self.concurrency))
    }

    async fn run_wave(&self, batch: Vec<FrontierEntry>) -> Vec<PipelineResult> {
        let ctx = self.ctx;
        stream::iter(batch)
            .map(|entry| process(ctx, entry))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Appends discovered entries, skipping queued and visited URLs
    fn merge(&self, discovered: Vec<FrontierEntry>) -> usize {
        let mut guard = self.ctx.state();
        let CrawlState { frontier, visited } = &mut *guard;
        frontier.merge(discovered, |url| visited.contains(url))
    }

    fn log_progress(&self, stats: &CrawlStatistics) {
        let processed = stats.processed();
        if processed > 0 && processed % PROGRESS_INTERVAL == 0 {
            let (visited, queued) = {
                let state = self.ctx.state();
                (state.visited.len(), state.frontier.len())
            };
            tracing::info!(
                "Progress: {} processed, {} indexed, {} visited, {} queued",
                processed,
                stats.pages_indexed(),
                visited,
                queued
            );
        }
    }
}
