//! Robots.txt caching implementation
//!
//! Policies are cached per host for the lifetime of one crawl run. Each host gets
//! a `OnceCell`, so concurrent first requests to a host share a single fetch.

use crate::robots::ParsedRobots;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

/// Cached robots.txt data for a host
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt policy
    pub policy: ParsedRobots,
}

impl CachedRobots {
    pub fn new(policy: ParsedRobots) -> Self {
        Self { policy }
    }

    /// Checks if a URL is allowed according to the cached robots.txt
    pub fn is_allowed(&self, url: &str, agent_token: &str) -> bool {
        self.policy.is_allowed(url, agent_token)
    }

    /// Gets the crawl delay from the cached robots.txt
    pub fn crawl_delay(&self, agent_token: &str) -> Option<f64> {
        self.policy.crawl_delay(agent_token)
    }
}

/// Per-host robots policy cache
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CachedRobots>>>>,
}

impl RobotsCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell for a host, creating an empty one on first use
    ///
    /// The lock is released before the caller initializes the cell.
    pub fn slot(&self, host: &str) -> Arc<OnceCell<CachedRobots>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Returns the cached policy for a host, if it has been resolved
    pub fn get(&self, host: &str) -> Option<CachedRobots> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(host).and_then(|cell| cell.get().cloned())
    }

    /// Number of hosts with a resolved policy
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|cell| cell.initialized()).count()
    }

    /// Returns true if no policy has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
