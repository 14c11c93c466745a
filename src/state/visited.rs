use std::collections::HashSet;

/// Result of trying to admit a URL into the visited set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// URL was new and is now visited
    Admitted,
    /// URL was already visited
    AlreadyVisited,
    /// The set already holds the page limit
    LimitReached,
}

/// URLs dequeued during this run
///
/// Grows monotonically. Membership is checked before any network action, so
/// each URL is fetched at most once.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL visited; returns false if it already was
    pub fn mark(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    /// Applies the page limit and marks the URL in one step
    pub fn admit(&mut self, url: &str, max_pages: usize) -> Admission {
        if self.urls.len() >= max_pages {
            Admission::LimitReached
        } else if self.mark(url) {
            Admission::Admitted
        } else {
            Admission::AlreadyVisited
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// True when `canonical` names a different, already visited URL
    ///
    /// Detection depends on crawl order: whichever of two equivalent pages is
    /// processed first is indexed.
    pub fn is_canonical_duplicate(&self, canonical: &str, current: &str) -> bool {
        canonical != current && self.contains(canonical)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
