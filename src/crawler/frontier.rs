//! FIFO frontier of URLs awaiting crawl

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A normalized URL waiting to be crawled, tagged with its link depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }
}

/// Ordered, deduplicated queue of pending entries
///
/// Each URL is queued at most once at a time; the first enqueue wins, which
/// keeps the shallowest depth under breadth-first order.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    queued: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry unless its URL is already queued
    ///
    /// Returns true if the entry was added.
    pub fn push(&mut self, entry: FrontierEntry) -> bool {
        if !self.queued.insert(entry.url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(entry);
        true
    }

    /// Appends discovered entries, skipping queued URLs and those `is_visited` accepts
    ///
    /// Returns the number of entries added.
    pub fn merge<I, F>(&mut self, entries: I, is_visited: F) -> usize
    where
        I: IntoIterator<Item = FrontierEntry>,
        F: Fn(&str) -> bool,
    {
        entries
            .into_iter()
            .filter(|entry| !is_visited(entry.url.as_str()))
            .map(|entry| self.push(entry))
            .filter(|added| *added)
            .count()
    }

    /// Removes up to `max` entries from the front
    pub fn take_batch(&mut self, max: usize) -> Vec<FrontierEntry> {
        let count = max.min(self.queue.len());
        let batch: Vec<FrontierEntry> = self.queue.drain(..count).collect();
        for entry in &batch {
            self.queued.remove(entry.url.as_str());
        }
        batch
    }

    pub fn contains(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
