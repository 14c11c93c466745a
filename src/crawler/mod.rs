//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML parsing, link discovery and content extraction
//! - Robots exclusion and per-host rate limiting
//! - The per-URL pipeline and the wave scheduler
//! - Overall crawl coordination

mod context;
mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod parser;
mod pipeline;
mod politeness;
mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{CrawlContext, CrawlLimits, CrawlState};
pub use coordinator::{crawl, Coordinator, CrawlReport};
pub use extractor::{extract, ExtractedContent, UNTITLED_PAGE};
pub use fetcher::{build_http_client, FetchError, FetchResponse, Fetcher, HttpFetcher};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{canonical_url, extract_links, parse_document};
pub use pipeline::{process, PipelineResult};
pub use politeness::{PolitenessController, MAX_CRAWL_DELAY};
pub use scheduler::{Scheduler, StopReason, PROGRESS_INTERVAL};
