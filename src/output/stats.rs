//! Crawl statistics
//!
//! Counters collected by the scheduler as pipeline results come in, plus a
//! formatted report for the end of a run.

use crate::crawler::PipelineResult;
use crate::state::{Outcome, PageState};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished (None while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// Count of pipeline results by terminal state
    pub pages_by_state: HashMap<PageState, u64>,

    /// Count of pipeline results by outcome tag
    pub pages_by_outcome: HashMap<Outcome, u64>,

    /// Indexed pages per link depth
    pub depth_breakdown: BTreeMap<u32, u64>,

    /// Frontier entries produced by all pipelines
    pub links_discovered: u64,

    /// Size of the visited set at the end of the run
    pub pages_visited: usize,

    /// Entries still queued when the run stopped
    pub frontier_remaining: usize,

    /// Hosts that received at least one page request
    pub unique_hosts: usize,

    /// URLs whose fetch failed, with the failure message
    pub failed_urls: Vec<(String, String)>,
}

impl CrawlStatistics {
    /// Creates empty statistics stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_by_state: HashMap::new(),
            pages_by_outcome: HashMap::new(),
            depth_breakdown: BTreeMap::new(),
            links_discovered: 0,
            pages_visited: 0,
            frontier_remaining: 0,
            unique_hosts: 0,
            failed_urls: Vec::new(),
        }
    }

    /// Counts one pipeline result
    pub fn record(&mut self, result: &PipelineResult) {
        *self.pages_by_state.entry(result.state).or_insert(0) += 1;
        *self.pages_by_outcome.entry(result.outcome()).or_insert(0) += 1;
        self.links_discovered += result.discovered.len() as u64;

        if result.state == PageState::Indexed {
            *self.depth_breakdown.entry(result.depth).or_insert(0) += 1;
        }

        if let Some(error) = &result.error {
            self.failed_urls
                .push((result.url.as_str().to_string(), error.clone()));
        }
    }

    /// Stamps the end of the run with final engine figures
    pub fn finish(&mut self, pages_visited: usize, frontier_remaining: usize, unique_hosts: usize) {
        self.finished_at = Some(Utc::now());
        self.pages_visited = pages_visited;
        self.frontier_remaining = frontier_remaining;
        self.unique_hosts = unique_hosts;
    }

    /// Number of pipeline results recorded
    pub fn processed(&self) -> u64 {
        self.pages_by_state.values().sum()
    }

    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    pub fn outcome_count(&self, outcome: Outcome) -> u64 {
        self.pages_by_outcome.get(&outcome).copied().unwrap_or(0)
    }

    pub fn pages_indexed(&self) -> u64 {
        self.outcome_count(Outcome::Indexed)
    }

    /// Run duration in seconds, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of visited pages that were indexed, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            return 0.0;
        }
        (self.pages_indexed() as f64 / self.pages_visited as f64) * 100.0
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Pages indexed: {}", stats.pages_indexed());
    println!("  Links discovered: {}", stats.links_discovered);
    println!("  Hosts contacted: {}", stats.unique_hosts);
    println!("  Left in frontier: {}", stats.frontier_remaining);
    if let Some(duration) = stats.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!();

    println!("Outcomes:");
    for outcome in [
        Outcome::Indexed,
        Outcome::Duplicate,
        Outcome::Denied,
        Outcome::Failed,
        Outcome::Skipped,
    ] {
        println!("  {}: {}", outcome, stats.outcome_count(outcome));
    }
    println!();

    println!("Pages by State:");
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let processed = stats.processed();
    for (state, count) in state_counts {
        let percentage = if processed > 0 {
            (*count as f64 / processed as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    if !stats.failed_urls.is_empty() {
        println!("Failed URLs ({}):", stats.failed_urls.len());
        for (url, error) in stats.failed_urls.iter().take(20) {
            println!("  - {} ({})", url, error);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} visited pages indexed)",
        stats.success_rate(),
        stats.pages_indexed(),
        stats.pages_visited
    );
}
