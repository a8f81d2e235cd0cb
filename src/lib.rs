//! Parking Ingest Library
//!
//! A Rust library for ingesting the City of Melbourne on-street parking datasets
//! into a relational store.
//!
//! This library provides tools for:
//! - Fetching the realtime parking bay sensor feed over HTTP
//! - Streaming the static reference CSV exports (sign plates, zone to street
//!   links, parking bays, population forecasts) row by row
//! - Encoding restriction day ranges such as `Mon-Fri` into 7-bit day masks
//! - Normalizing raw rows into typed records, skipping malformed rows
//! - Handing normalized records to an injected record sink (SQLite or in-memory)

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod day_encoder;
        pub mod ingest_pipeline;
        pub mod record_normalizer;
        pub mod record_sink;
        pub mod source_reader;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{NormalizedRecord, RawRecord, SkipReason, StaticDataset};
pub use app::services::day_encoder::{DayMask, Weekday, encode_days};
pub use app::services::record_sink::{RecordSink, SinkError};
pub use config::IngestConfig;

/// Result type alias for parking ingestion
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for parking ingestion operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Header row is missing columns the dataset needs
    #[error("File '{file}' is missing required columns: {}", columns.join(", "))]
    MissingColumns { file: String, columns: Vec<String> },

    /// Remote source could not be retrieved
    #[error("Source unavailable at {url}: {message}")]
    SourceUnavailable {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Remote source answered with an unexpected body
    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// Unrecognized day abbreviation in a restriction day specification
    #[error("Invalid day '{token}' in day specification '{spec}'")]
    InvalidDay { token: String, spec: String },

    /// Date/time parsing error
    #[error("Date/time parsing error for {field} = '{value}'")]
    DateTimeParsing {
        field: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Record sink rejected or failed to store a record
    #[error("Record sink error: {0}")]
    Sink(#[from] SinkError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a missing columns error
    pub fn missing_columns(file: impl Into<String>, columns: Vec<String>) -> Self {
        Self::MissingColumns {
            file: file.into(),
            columns,
        }
    }

    /// Create a source unavailable error
    pub fn source_unavailable(
        url: impl Into<String>,
        message: impl Into<String>,
        source: Option<reqwest::Error>,
    ) -> Self {
        Self::SourceUnavailable {
            url: url.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an invalid day error
    pub fn invalid_day(token: impl Into<String>, spec: impl Into<String>) -> Self {
        Self::InvalidDay {
            token: token.into(),
            spec: spec.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(
        field: impl Into<String>,
        value: impl Into<String>,
        source: chrono::ParseError,
    ) -> Self {
        Self::DateTimeParsing {
            field: field.into(),
            value: value.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}
