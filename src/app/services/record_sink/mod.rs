//! Record sinks: where normalized records go
//!
//! The pipelines never talk to a database directly. They receive a
//! `&mut dyn RecordSink` and call [`RecordSink::insert`] once per accepted
//! record, so the storage backend is chosen by the caller.
//!
//! - [`sqlite`] - Persistent SQLite store with one table per record kind
//! - [`memory`] - In-memory recorder for tests and dry runs

pub mod memory;
pub mod sqlite;

#[cfg(test)]
pub mod tests;

pub use memory::MemorySink;
pub use sqlite::SqliteSink;

use crate::app::models::NormalizedRecord;
use crate::constants::tables;

/// Tables a sink accepts
pub const KNOWN_TABLES: [&str; 5] = [
    tables::SENSOR_READINGS,
    tables::SIGN_PLATES,
    tables::ZONE_STREET_LINKS,
    tables::PARKING_BAYS,
    tables::POPULATION_FORECASTS,
];

/// Errors raised at the sink boundary
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("Unknown table '{0}'")]
    UnknownTable(String),

    #[error("A {record_table} record cannot be stored in table '{table}'")]
    TableMismatch { table: String, record_table: String },

    #[error("Sink is closed")]
    Closed,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to serialize record attributes: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for normalized records
pub trait RecordSink {
    /// Store one record in `table`
    ///
    /// `table` must be the record's own table (see [`NormalizedRecord::table`]).
    fn insert(&mut self, table: &str, record: &NormalizedRecord) -> Result<(), SinkError>;

    /// Flush and release the backend; later inserts fail with [`SinkError::Closed`]
    fn close(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Check that `table` is known and matches the record
pub fn validate_table(table: &str, record: &NormalizedRecord) -> Result<(), SinkError> {
    if !KNOWN_TABLES.contains(&table) {
        return Err(SinkError::UnknownTable(table.to_string()));
    }

    if record.table() != table {
        return Err(SinkError::TableMismatch {
            table: table.to_string(),
            record_table: record.table().to_string(),
        });
    }

    Ok(())
}
