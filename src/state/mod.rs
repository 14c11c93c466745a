//! State module for tracking crawl progress
//!
//! This module provides state management for pages and hosts during the crawl process.
//!
//! # Components
//!
//! - `PageState`: Tracks the state of an individual URL in the crawl pipeline
//! - `Outcome`: Coarse result tag for each terminal page state
//! - `HostState`: Tracks per-host request timing for rate limiting
//! - `VisitedSet`: URLs already dequeued during this run

mod host_state;
mod page_state;
mod visited;

// Re-export main types
pub use host_state::HostState;
pub use page_state::{Outcome, PageState};
pub use visited::{Admission, VisitedSet};
