//! In-memory record sink

use std::collections::BTreeMap;
use tracing::trace;

use super::{RecordSink, SinkError, validate_table};
use crate::app::models::NormalizedRecord;

/// Keeps every inserted record, grouped by table, in insertion order
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: BTreeMap<String, Vec<NormalizedRecord>>,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records stored in `table`
    pub fn records(&self, table: &str) -> &[NormalizedRecord] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of records stored in `table`
    pub fn len(&self, table: &str) -> usize {
        self.records(table).len()
    }

    /// Number of records across all tables
    pub fn total_len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl RecordSink for MemorySink {
    fn insert(&mut self, table: &str, record: &NormalizedRecord) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        validate_table(table, record)?;

        trace!("memory sink: {} <- {:?}", table, record);
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.closed = true;
        Ok(())
    }
}
