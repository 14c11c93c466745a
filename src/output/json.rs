//! JSON index file output

use crate::output::traits::{IndexWriter, OutputResult};
use crate::output::PageRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes records as a pretty-printed JSON array
///
/// Non-ASCII text is written as UTF-8, not escaped.
#[derive(Debug, Clone)]
pub struct JsonIndexWriter {
    path: PathBuf,
}

impl JsonIndexWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serializes records in index order
pub fn to_json(records: &[PageRecord]) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

impl IndexWriter for JsonIndexWriter {
    fn write(&self, records: &[PageRecord]) -> OutputResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = to_json(records)?;
        fs::write(&self.path, json)?;

        tracing::debug!("Index written to {}", self.path.display());
        Ok(())
    }
}
