use crate::output::traits::{IndexWriter, OutputResult};
use crate::output::PageRecord;

/// Append-only collection of the records produced during a run
#[derive(Debug, Clone, Default)]
pub struct IndexSink {
    records: Vec<PageRecord>,
}

impl IndexSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PageRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hands every record to `writer`; returns the number written
    pub fn flush(&self, writer: &dyn IndexWriter) -> OutputResult<usize> {
        writer.write(&self.records)?;
        tracing::info!("Wrote {} index records", self.records.len());
        Ok(self.records.len())
    }
}
