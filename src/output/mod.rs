//! Output module for the search index and crawl reports
//!
//! This module handles:
//! - The index record type and its JSON serialization
//! - Collecting records during a run and persisting them at the end
//! - Recording crawl statistics and generating markdown summaries

mod json;
mod markdown;
mod sink;
pub mod stats;
mod traits;

pub use json::{to_json, JsonIndexWriter};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use sink::IndexSink;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{IndexWriter, OutputError, OutputResult};

use crate::crawler::ExtractedContent;
use serde::{Deserialize, Serialize};

/// One search index document
///
/// Field order is the serialized order: `id, title, content, url, snippet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// The page URL, used as the document id
    pub id: String,
    pub title: String,
    /// Full visible text of the page
    pub content: String,
    pub url: String,
    pub snippet: String,
}

impl PageRecord {
    /// Builds the record for a page from its extracted content
    pub fn new(url: &str, extracted: ExtractedContent) -> Self {
        Self {
            id: url.to_string(),
            title: extracted.title,
            content: extracted.content,
            url: url.to_string(),
            snippet: extracted.snippet,
        }
    }
}
