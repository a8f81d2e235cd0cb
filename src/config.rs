//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then environment variables and
//! command-line flags (both resolved by clap in [`crate::cli::args`]).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::app::models::StaticDataset;
use crate::constants::{
    APP_DIR_NAME, DEFAULT_DATABASE_FILENAME, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_REALTIME_URL,
};
use crate::{Error, Result};

/// Realtime sensor feed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Records endpoint of the sensor feed
    pub url: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REALTIME_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Static CSV dataset settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticDataConfig {
    /// Directory holding the CSV exports under their published file names
    pub data_dir: PathBuf,

    /// Datasets to ingest, in order
    pub datasets: Vec<StaticDataset>,
}

impl Default for StaticDataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            datasets: StaticDataset::ALL.to_vec(),
        }
    }
}

impl StaticDataConfig {
    /// Expected location of a dataset's CSV file
    pub fn path_for(&self, dataset: StaticDataset) -> PathBuf {
        self.data_dir.join(dataset.default_file_name())
    }
}

/// Record sink settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Normalize and count records without persisting them
    pub dry_run: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            dry_run: false,
        }
    }
}

/// Logging and terminal output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is not set
    pub level: String,

    /// Draw progress bars
    pub show_progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_progress: true,
        }
    }
}

/// Complete configuration for an ingestion run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    pub realtime: RealtimeConfig,
    pub static_data: StaticDataConfig,
    pub sink: SinkConfig,
    pub logging: LoggingConfig,
}

impl IngestConfig {
    /// Set the realtime feed URL
    pub fn with_realtime_url(mut self, url: impl Into<String>) -> Self {
        self.realtime.url = url.into();
        self
    }

    /// Set the HTTP timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.realtime.timeout_secs = timeout_secs;
        self
    }

    /// Set the directory holding the static CSV exports
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.static_data.data_dir = data_dir.into();
        self
    }

    /// Restrict the static run to the given datasets
    pub fn with_datasets(mut self, datasets: Vec<StaticDataset>) -> Self {
        self.static_data.datasets = datasets;
        self
    }

    /// Set the SQLite database path
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sink.database_path = path.into();
        self
    }

    /// Enable dry-run mode
    pub fn with_dry_run(mut self) -> Self {
        self.sink.dry_run = true;
        self
    }

    /// Set the default log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Hide progress bars
    pub fn without_progress(mut self) -> Self {
        self.logging.show_progress = false;
        self
    }

    /// HTTP timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.realtime.timeout_secs)
    }

    /// Check the configuration for values that cannot work
    pub fn validate(&self) -> Result<()> {
        let url = self.realtime.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::configuration(format!(
                "Realtime URL must be http or https: '{}'",
                self.realtime.url
            )));
        }

        if self.realtime.timeout_secs == 0 {
            return Err(Error::configuration("HTTP timeout must be at least 1 second"));
        }

        if self.static_data.datasets.is_empty() {
            return Err(Error::configuration("At least one static dataset is required"));
        }

        if !self.sink.dry_run && self.sink.database_path.as_os_str().is_empty() {
            return Err(Error::configuration("Database path is empty"));
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

/// Default database location under the platform data directory
///
/// Falls back to the working directory when the platform has none.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR_NAME)
        .join(DEFAULT_DATABASE_FILENAME)
}
