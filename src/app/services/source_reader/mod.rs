//! Tabular sources for the parking datasets
//!
//! Two kinds of source feed the normalizer:
//! - [`csv_source`] - Static CSV exports, streamed row by row from disk
//! - [`http_source`] - The realtime sensor feed, one JSON response per run
//!
//! A CSV file that does not exist is not an error. [`CsvSource::open`] returns
//! `Ok(None)` so callers can report the dataset as not found and carry on.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use parking_ingest::app::services::source_reader::CsvSource;
//!
//! # fn example() -> parking_ingest::Result<()> {
//! if let Some(source) = CsvSource::open("on-street-parking-bays.csv".as_ref())? {
//!     println!("columns: {:?}", source.mapping().columns);
//!     for record in source {
//!         let _outcome = record?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod csv_source;
pub mod http_source;

#[cfg(test)]
pub mod tests;

pub use csv_source::CsvSource;
pub use http_source::{HttpSource, parse_records_body};
