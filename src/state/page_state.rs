/// Page state definitions for tracking crawl progress
///
/// This module defines every state a URL can be in while it moves through the
/// crawl pipeline, and the coarse outcome tag each terminal state maps to.
use std::fmt;

/// Represents the current state of a URL in the crawl pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Active States =====
    /// Entry was dequeued and awaits the limit checks
    Queued,

    /// Robots policy allowed the URL
    RobotsAllowed,

    /// Waiting for the host's rate-limit slot
    RateLimited,

    /// Request is in flight
    Fetching,

    /// Response arrived and passed validation
    Fetched,

    /// Document is being parsed and extracted
    Parsing,

    // ===== Terminal Success States =====
    /// A record was produced
    Indexed,

    // ===== Terminal Skip States =====
    /// Declared canonical URL was already visited
    CanonicalDuplicate,

    /// Response was not HTML
    ContentTypeRejected,

    /// Entry deeper than the maximum depth; never enters the visited set
    DepthExceeded,

    /// Visited set already holds the maximum number of pages
    PageLimitHit,

    /// URL was already in the visited set
    AlreadyVisited,

    // ===== Terminal Error States =====
    /// Disallowed by robots.txt
    RobotsDenied,

    /// Transport failure, timeout or non-success HTTP status
    FetchFailed,
}

/// Coarse per-URL outcome tag aggregated by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Indexed,
    Duplicate,
    Denied,
    Failed,
    Skipped,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if this is an active state (the pipeline is still running)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Queued
                | Self::RobotsAllowed
                | Self::RateLimited
                | Self::Fetching
                | Self::Fetched
                | Self::Parsing
        )
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Indexed)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::RobotsDenied | Self::FetchFailed)
    }

    /// Returns true if the transition `self -> next` is part of the state machine
    pub fn can_transition_to(&self, next: PageState) -> bool {
        use PageState::*;
        matches!(
            (self, next),
            (Queued, DepthExceeded | PageLimitHit | AlreadyVisited | RobotsDenied | RobotsAllowed)
                | (RobotsAllowed, RateLimited)
                | (RateLimited, Fetching)
                | (Fetching, FetchFailed | ContentTypeRejected | Fetched)
                | (Fetched, Parsing)
                | (Parsing, CanonicalDuplicate | Indexed)
        )
    }

    /// Maps a terminal state to its outcome tag
    ///
    /// Returns None for active states.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Indexed => Some(Outcome::Indexed),
            Self::CanonicalDuplicate => Some(Outcome::Duplicate),
            Self::RobotsDenied => Some(Outcome::Denied),
            Self::FetchFailed => Some(Outcome::Failed),
            Self::ContentTypeRejected
            | Self::DepthExceeded
            | Self::PageLimitHit
            | Self::AlreadyVisited => Some(Outcome::Skipped),
            _ => None,
        }
    }

    /// Stable snake_case name used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::RobotsAllowed => "robots_allowed",
            Self::RateLimited => "rate_limited",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Parsing => "parsing",
            Self::Indexed => "indexed",
            Self::CanonicalDuplicate => "canonical_duplicate",
            Self::ContentTypeRejected => "content_type_rejected",
            Self::DepthExceeded => "depth_exceeded",
            Self::PageLimitHit => "page_limit_hit",
            Self::AlreadyVisited => "already_visited",
            Self::RobotsDenied => "robots_denied",
            Self::FetchFailed => "fetch_failed",
        }
    }

    /// Returns all terminal states
    pub fn terminal_states() -> Vec<Self> {
        vec![
            Self::Indexed,
            Self::CanonicalDuplicate,
            Self::ContentTypeRejected,
            Self::DepthExceeded,
            Self::PageLimitHit,
            Self::AlreadyVisited,
            Self::RobotsDenied,
            Self::FetchFailed,
        ]
    }
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::Duplicate => "duplicate",
            Self::Denied => "denied",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
