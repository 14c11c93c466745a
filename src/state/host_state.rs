use std::time::{Duration, Instant};

/// Tracks the state of a host during crawling
///
/// This structure maintains the per-host information needed for rate
/// limiting: the time slot of the most recently reserved request.
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of page requests reserved against this host
    pub request_count: u32,

    /// Time of the most recently reserved request (may lie in the future)
    pub last_request_time: Option<Instant>,
}

impl HostState {
    /// Creates a new HostState with no request history
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next request slot and returns how long the caller must wait
    ///
    /// The slot is `max(now, last + interval)`. It is recorded before the caller
    /// sleeps, so concurrent callers against one host queue up behind each
    /// other instead of all observing the same stale timestamp. An interval too
    /// large to represent keeps the previous slot.
    pub fn reserve(&mut self, interval: Duration, now: Instant) -> Duration {
        let slot = match self.last_request_time {
            Some(last) => last.checked_add(interval).unwrap_or(last).max(now),
            None => now,
        };

        self.request_count = self.request_count.saturating_add(1);
        self.last_request_time = Some(slot);
        slot.saturating_duration_since(now)
    }
}
