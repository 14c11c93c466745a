//! Output traits and error types
//!
//! This module defines the persistence seam for the final record set.

use crate::output::PageRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists the index records of a finished crawl
///
/// Called once per run with the complete record sequence. A failure here is
/// fatal for the run.
pub trait IndexWriter {
    /// Writes all records, replacing any previous output
    fn write(&self, records: &[PageRecord]) -> OutputResult<()>;
}
