//! Ingestion pipelines: source, then normalizer, then sink
//!
//! ## Architecture
//!
//! - [`pipeline`] - Static CSV and realtime feed orchestration
//! - [`stats`] - Per-dataset counts and skip tallies
//! - [`progress`] - Progress bar handling, hidden in quiet mode
//!
//! Records are processed one at a time in source order. A record counts as
//! parsed only once the sink has accepted it; skipped rows are tallied by
//! reason and never reach the sink. Hard errors abort the current dataset.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use parking_ingest::StaticDataset;
//! use parking_ingest::app::services::ingest_pipeline::{ProgressReporter, ingest_static};
//! use parking_ingest::app::services::record_sink::MemorySink;
//!
//! # fn example() -> parking_ingest::Result<()> {
//! let mut sink = MemorySink::new();
//! let mut progress = ProgressReporter::hidden();
//! let outcome = ingest_static(
//!     StaticDataset::Signs,
//!     "data/sign-plates-located-in-each-parking-zone.csv".as_ref(),
//!     &mut sink,
//!     &mut progress,
//! )?;
//! println!("Signs parsed: {}", outcome.parsed_count());
//! # Ok(())
//! # }
//! ```

pub mod pipeline;
pub mod progress;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use pipeline::{IngestOutcome, ingest_realtime, ingest_sensor_records, ingest_static};
pub use progress::ProgressReporter;
pub use stats::IngestStats;
