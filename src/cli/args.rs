//! Command-line argument definitions for parking ingest
//!
//! This module defines the CLI interface using the clap derive API. Every
//! path and URL flag can also be set through a `PARKING_INGEST_*` environment
//! variable; an explicit flag wins over the environment.

use crate::app::models::StaticDataset;
use crate::config::IngestConfig;
use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_REALTIME_URL, STATIC_DATASET_NAMES};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the parking data ingester
///
/// Loads the City of Melbourne on-street parking datasets into SQLite.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "parking_ingest",
    version,
    about = "Ingest City of Melbourne on-street parking data into SQLite",
    long_about = "Fetches the realtime on-street parking bay sensor feed and parses the static \
                  reference exports (sign plates, zone to street segment links, parking bays and \
                  population forecasts), normalizes every record and stores it in a SQLite \
                  database. Malformed rows are skipped and counted."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Fetch the realtime bay sensor feed and store the readings
    Realtime(RealtimeArgs),
    /// Parse the static reference CSV exports and store their rows
    Static(StaticArgs),
}

/// Arguments for the realtime command
#[derive(Debug, Clone, Parser)]
pub struct RealtimeArgs {
    /// Records endpoint of the sensor feed
    #[arg(
        long = "url",
        value_name = "URL",
        env = "PARKING_INGEST_URL",
        default_value = DEFAULT_REALTIME_URL,
        help = "Records endpoint of the parking bay sensor feed"
    )]
    pub url: String,

    /// Whole-request timeout for the feed
    #[arg(
        long = "timeout",
        value_name = "SECS",
        default_value_t = DEFAULT_HTTP_TIMEOUT_SECS,
        help = "HTTP timeout in seconds"
    )]
    pub timeout_secs: u64,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the static command
#[derive(Debug, Clone, Parser)]
pub struct StaticArgs {
    /// Directory holding the CSV exports
    ///
    /// Files are looked up under their published names, e.g.
    /// sign-plates-located-in-each-parking-zone.csv. A missing file is
    /// reported as not found and the remaining datasets still run.
    #[arg(
        short = 'i',
        long = "data-dir",
        value_name = "DIR",
        env = "PARKING_INGEST_DATA_DIR",
        default_value = ".",
        help = "Directory holding the static CSV exports"
    )]
    pub data_dir: PathBuf,

    /// Datasets to ingest (comma-separated list)
    #[arg(
        short = 'd',
        long = "datasets",
        value_name = "LIST",
        help = "Comma-separated list of datasets to ingest",
        long_help = "Static datasets to ingest as a comma-separated list.\n\
                     Available datasets:\n  \
                     signs, zone-streets, bays, population-forecasts\n\n\
                     If not specified, all four are ingested in that order."
    )]
    pub datasets: Option<DatasetList>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Flags shared by every subcommand
#[derive(Debug, Clone, Parser)]
pub struct CommonArgs {
    /// SQLite database file
    ///
    /// Defaults to parking.sqlite3 under the platform data directory.
    #[arg(
        long = "database",
        value_name = "PATH",
        env = "PARKING_INGEST_DATABASE",
        help = "SQLite database file to write to"
    )]
    pub database: Option<PathBuf>,

    /// Normalize and count records without writing them
    #[arg(
        long = "dry-run",
        help = "Normalize and count records without writing to the database"
    )]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Also hides progress bars.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the run summary"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Wrapper for parsing comma-separated dataset lists
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetList {
    pub datasets: Vec<StaticDataset>,
}

impl FromStr for DatasetList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut datasets = Vec::new();

        for name in s.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let dataset: StaticDataset = name.parse()?;
            if !datasets.contains(&dataset) {
                datasets.push(dataset);
            }
        }

        if datasets.is_empty() {
            return Err(Error::data_validation(format!(
                "Dataset list cannot be empty. Available datasets: {}",
                STATIC_DATASET_NAMES.join(", ")
            )));
        }

        Ok(DatasetList { datasets })
    }
}

impl Commands {
    /// Flags shared by every subcommand
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Realtime(args) => &args.common,
            Commands::Static(args) => &args.common,
        }
    }

    /// Build the run configuration from defaults and these arguments
    pub fn to_config(&self) -> IngestConfig {
        let common = self.common();
        let mut config = IngestConfig::default().with_log_level(common.get_log_level());

        if let Some(database) = &common.database {
            config = config.with_database_path(database.clone());
        }
        if common.dry_run {
            config = config.with_dry_run();
        }
        if !common.show_progress() {
            config = config.without_progress();
        }

        match self {
            Commands::Realtime(args) => config
                .with_realtime_url(args.url.clone())
                .with_timeout_secs(args.timeout_secs),
            Commands::Static(args) => {
                let config = config.with_data_dir(args.data_dir.clone());
                match &args.datasets {
                    Some(list) => config.with_datasets(list.datasets.clone()),
                    None => config,
                }
            }
        }
    }
}

impl StaticArgs {
    /// Validate the static command arguments for consistency
    ///
    /// A data directory that does not exist is allowed; every dataset in it
    /// then reports as not found.
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.exists() && !self.data_dir.is_dir() {
            return Err(Error::configuration(format!(
                "Data directory is not a directory: {}",
                self.data_dir.display()
            )));
        }

        Ok(())
    }
}

impl CommonArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Commands {
        Args::try_parse_from(args).unwrap().command.unwrap()
    }

    #[test]
    fn test_dataset_list_parsing() {
        let list: DatasetList = "signs, bays,signs".parse().unwrap();
        assert_eq!(list.datasets, vec![StaticDataset::Signs, StaticDataset::Bays]);

        assert!("".parse::<DatasetList>().is_err());
        assert!(" , ".parse::<DatasetList>().is_err());
        assert!("signs,meters".parse::<DatasetList>().is_err());
    }

    #[test]
    fn test_realtime_defaults() {
        let command = parse(&["parking_ingest", "realtime"]);
        let Commands::Realtime(args) = &command else {
            panic!("expected realtime command");
        };

        assert_eq!(args.timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(args.common.output_format, OutputFormat::Human);
        assert_eq!(args.common.get_log_level(), "warn");
        assert!(args.common.show_progress());
    }

    #[test]
    fn test_static_flags_reach_config() {
        let command = parse(&[
            "parking_ingest",
            "static",
            "--data-dir",
            "/data/melbourne",
            "--datasets",
            "bays,population-forecasts",
            "--database",
            "/tmp/parking.sqlite3",
            "--dry-run",
            "-vv",
        ]);

        let config = command.to_config();
        assert_eq!(config.static_data.data_dir, PathBuf::from("/data/melbourne"));
        assert_eq!(
            config.static_data.datasets,
            vec![StaticDataset::Bays, StaticDataset::PopulationForecasts]
        );
        assert_eq!(config.sink.database_path, PathBuf::from("/tmp/parking.sqlite3"));
        assert!(config.sink.dry_run);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_quiet_hides_progress() {
        let command = parse(&["parking_ingest", "realtime", "-q", "--timeout", "5"]);
        let config = command.to_config();

        assert_eq!(config.logging.level, "error");
        assert!(!config.logging.show_progress);
        assert_eq!(config.realtime.timeout_secs, 5);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["parking_ingest", "static", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_json_output_format() {
        let command = parse(&["parking_ingest", "static", "--output-format", "json"]);
        assert_eq!(command.common().output_format, OutputFormat::Json);
    }

    #[test]
    fn test_missing_data_dir_passes_validation() {
        let command = parse(&["parking_ingest", "static", "--data-dir", "/no/such/dir"]);
        let Commands::Static(args) = command else {
            panic!("expected static command");
        };
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_data_dir_that_is_a_file_fails_validation() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        let command = parse(&["parking_ingest", "static", "--data-dir", path]);
        let Commands::Static(args) = command else {
            panic!("expected static command");
        };
        assert!(matches!(args.validate(), Err(Error::Configuration { .. })));
    }
}
