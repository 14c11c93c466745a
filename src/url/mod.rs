//! URL handling module for Sitesift
//!
//! This module provides URL normalization, host extraction, and the scope
//! filter that decides whether a discovered link may ever be queued.

mod domain;
mod normalize;
mod scope;

// Re-export main functions
pub use domain::{extract_domain, host_key};
pub use normalize::{normalize_url, resolve_link};
pub use scope::ScopeFilter;
