//! Engine state shared by the pipelines of one crawl run

use crate::config::Config;
use crate::crawler::frontier::Frontier;
use crate::crawler::politeness::PolitenessController;
use crate::state::VisitedSet;
use crate::url::ScopeFilter;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Frontier and visited set, guarded together
#[derive(Debug, Default)]
pub struct CrawlState {
    pub frontier: Frontier,
    pub visited: VisitedSet,
}

/// Run-wide bounds applied by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    pub max_pages: usize,
    pub max_depth: u32,
    pub snippet_length: usize,
}

impl CrawlLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_pages: config.crawler.max_pages,
            max_depth: config.crawler.max_depth,
            snippet_length: config.extract.snippet_length,
        }
    }
}

/// Everything a pipeline run needs, owned by one coordinator
///
/// The state lock is only taken in short synchronous sections and is never
/// held across an await.
#[derive(Debug)]
pub struct CrawlContext<F> {
    pub fetcher: F,
    pub politeness: PolitenessController,
    pub scope: ScopeFilter,
    pub limits: CrawlLimits,
    state: Mutex<CrawlState>,
}

impl<F> CrawlContext<F> {
    pub fn new(config: &Config, fetcher: F) -> Self {
        Self {
            fetcher,
            politeness: PolitenessController::from_config(config),
            scope: ScopeFilter::from_config(&config.crawler),
            limits: CrawlLimits::from_config(config),
            state: Mutex::new(CrawlState::default()),
        }
    }

    /// Locks the frontier and visited set
    pub fn state(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn visited_count(&self) -> usize {
        self.state().visited.len()
    }

    pub fn page_limit_reached(&self) -> bool {
        self.visited_count() >= self.limits.max_pages
    }
}
