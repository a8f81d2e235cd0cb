//! Command implementations for the parking ingest CLI
//!
//! This module wires configuration, the record sink and the ingestion
//! pipelines together, and prints the run summary.

use crate::app::models::StaticDataset;
use crate::app::services::ingest_pipeline::{
    IngestOutcome, ProgressReporter, ingest_realtime, ingest_static,
};
use crate::app::services::record_sink::{MemorySink, RecordSink, SqliteSink};
use crate::app::services::source_reader::HttpSource;
use crate::cli::args::{Args, Commands, OutputFormat};
use crate::config::{IngestConfig, LoggingConfig};
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Result of one dataset within a run
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    /// Dataset name (`realtime`, `signs`, ...)
    pub dataset: String,

    /// Label used in the human summary
    pub label: String,

    /// How the dataset ended, when it did not fail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<IngestOutcome>,

    /// Error that aborted the dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatasetReport {
    fn completed(dataset: &str, label: &str, outcome: IngestOutcome) -> Self {
        Self {
            dataset: dataset.to_string(),
            label: label.to_string(),
            outcome: Some(outcome),
            error: None,
        }
    }

    fn failed(dataset: &str, label: &str, error: &Error) -> Self {
        Self {
            dataset: dataset.to_string(),
            label: label.to_string(),
            outcome: None,
            error: Some(error.to_string()),
        }
    }

    /// Records stored, `-1` when the source was not found, `None` on failure
    pub fn parsed_count(&self) -> Option<i64> {
        self.outcome.as_ref().map(IngestOutcome::parsed_count)
    }
}

/// Summary of a whole run for reporting
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Subcommand that ran
    pub command: String,

    /// Whether records were kept in memory only
    pub dry_run: bool,

    /// Per-dataset results in processing order
    pub datasets: Vec<DatasetReport>,

    /// Total processing time
    #[serde(skip)]
    pub processing_time: Duration,
}

impl RunSummary {
    /// Records stored across all datasets
    pub fn total_parsed(&self) -> usize {
        self.datasets
            .iter()
            .filter_map(|report| report.outcome.as_ref()?.stats())
            .map(|stats| stats.records_parsed)
            .sum()
    }

    /// Records skipped across all datasets
    pub fn total_skipped(&self) -> usize {
        self.datasets
            .iter()
            .filter_map(|report| report.outcome.as_ref()?.stats())
            .map(|stats| stats.records_skipped)
            .sum()
    }

    /// Number of datasets that aborted with an error
    pub fn failed_count(&self) -> usize {
        self.datasets
            .iter()
            .filter(|report| report.error.is_some())
            .count()
    }
}

/// Main command runner
///
/// 1. Set up logging and configuration
/// 2. Open the record sink
/// 3. Run the requested pipeline
/// 4. Close the sink and print the summary
pub async fn run(args: Args) -> Result<RunSummary> {
    let start_time = Instant::now();

    let command = args
        .command
        .ok_or_else(|| Error::configuration("No command given"))?;
    let config = command.to_config();
    setup_logging(&config.logging);

    info!("Starting parking ingest");
    debug!("Command line arguments: {:?}", command);

    if let Commands::Static(static_args) = &command {
        static_args.validate()?;
    }

    let config = load_configuration(config)?;
    let mut sink = open_sink(&config)?;
    let mut progress = ProgressReporter::new(config.logging.show_progress);

    let result = match &command {
        Commands::Realtime(_) => run_realtime(&config, sink.as_mut(), &mut progress).await,
        Commands::Static(_) => Ok(run_static(&config, sink.as_mut(), &mut progress)),
    };

    // Close even when the run failed so the database is left consistent
    let close_result = sink.close();
    let mut summary = result?;
    close_result?;

    summary.processing_time = start_time.elapsed();
    generate_final_report(command.common().output_format, &summary)?;

    match summary.failed_count() {
        0 => Ok(summary),
        failed => Err(Error::data_validation(format!(
            "{} of {} datasets failed",
            failed,
            summary.datasets.len()
        ))),
    }
}

/// Set up structured logging from the logging configuration
///
/// `RUST_LOG` wins over the configured level.
fn setup_logging(logging: &LoggingConfig) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(logging)));

    // Progress bars are only hidden in quiet mode
    let result = if !logging.show_progress {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    match result {
        Ok(()) => debug!("Logging initialized at level: {}", logging.level),
        Err(e) => debug!("Logging already initialized: {}", e),
    }
}

fn filter_directive(logging: &LoggingConfig) -> String {
    format!("parking_ingest={}", logging.level)
}

/// Validate the configuration built from defaults, env and flags
fn load_configuration(config: IngestConfig) -> Result<IngestConfig> {
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Open the sink the configuration asks for
fn open_sink(config: &IngestConfig) -> Result<Box<dyn RecordSink>> {
    if config.sink.dry_run {
        info!("Dry run: records are normalized and counted but not stored");
        return Ok(Box::new(MemorySink::new()));
    }

    let sink = SqliteSink::open(&config.sink.database_path).map_err(|e| {
        Error::configuration(format!(
            "Failed to open database '{}': {}",
            config.sink.database_path.display(),
            e
        ))
    })?;
    Ok(Box::new(sink))
}

/// Ingest the realtime feed; any error is fatal
async fn run_realtime(
    config: &IngestConfig,
    sink: &mut dyn RecordSink,
    progress: &mut ProgressReporter,
) -> Result<RunSummary> {
    let source = HttpSource::new(config.realtime.url.clone(), config.timeout())?;
    let outcome = ingest_realtime(&source, sink, progress).await?;

    Ok(RunSummary {
        command: "realtime".to_string(),
        dry_run: config.sink.dry_run,
        datasets: vec![DatasetReport::completed("realtime", "Realtime", outcome)],
        ..Default::default()
    })
}

/// Ingest each configured static dataset in turn
///
/// A dataset that fails is recorded and the rest still run, unless the
/// error is critical.
fn run_static(
    config: &IngestConfig,
    sink: &mut dyn RecordSink,
    progress: &mut ProgressReporter,
) -> RunSummary {
    let mut summary = RunSummary {
        command: "static".to_string(),
        dry_run: config.sink.dry_run,
        ..Default::default()
    };

    for &dataset in &config.static_data.datasets {
        let path = config.static_data.path_for(dataset);

        match ingest_static(dataset, &path, sink, progress) {
            Ok(outcome) => {
                summary.datasets.push(DatasetReport::completed(
                    dataset.name(),
                    dataset.label(),
                    outcome,
                ));
            }
            Err(e) => {
                error!("Failed to ingest {}: {}", dataset, e);
                summary
                    .datasets
                    .push(DatasetReport::failed(dataset.name(), dataset.label(), &e));

                if is_critical_error(&e) {
                    skip_remaining(&mut summary, config, dataset);
                    break;
                }
            }
        }
    }

    summary
}

/// Mark datasets after `failed` as not attempted
fn skip_remaining(summary: &mut RunSummary, config: &IngestConfig, failed: StaticDataset) {
    let remaining = config
        .static_data
        .datasets
        .iter()
        .skip_while(|dataset| **dataset != failed)
        .skip(1);

    for &dataset in remaining {
        let reason = Error::data_validation(format!("Not attempted after {} failed", failed));
        summary
            .datasets
            .push(DatasetReport::failed(dataset.name(), dataset.label(), &reason));
    }
}

/// Check if an error should stop the remaining datasets
///
/// Sink and I/O failures affect every dataset alike, so there is no point
/// carrying on.
fn is_critical_error(error: &Error) -> bool {
    matches!(
        error,
        Error::Sink(_) | Error::Io { .. } | Error::Configuration { .. }
    )
}

/// Generate final report
fn generate_final_report(format: OutputFormat, summary: &RunSummary) -> Result<()> {
    match format {
        OutputFormat::Human => {
            generate_human_report(summary);
            Ok(())
        }
        OutputFormat::Json => generate_json_report(summary),
    }
}

/// One summary line per dataset, e.g. `Signs parsed: 1234`
fn format_dataset_line(report: &DatasetReport) -> String {
    match (&report.outcome, &report.error) {
        (Some(IngestOutcome::Completed(stats)), _) => {
            let mut line = format!(
                "{} {}",
                format!("{} parsed:", report.label).bright_cyan(),
                stats.records_parsed.to_string().bright_white().bold()
            );
            if stats.records_skipped > 0 {
                line.push_str(&format!(
                    " ({} skipped)",
                    stats.records_skipped.to_string().yellow()
                ));
            }
            line
        }
        (Some(IngestOutcome::NotFound { path }), _) => format!(
            "{} {} {}",
            format!("{} parsed:", report.label).bright_cyan(),
            "-1".yellow(),
            format!("(not found: {})", path.display()).yellow()
        ),
        (None, error) => format!(
            "{} {}",
            format!("{} failed:", report.label).bright_red(),
            error.as_deref().unwrap_or("unknown error").bright_red()
        ),
    }
}

/// Generate human-readable report
fn generate_human_report(summary: &RunSummary) {
    let title = if summary.dry_run {
        "Ingest Summary (dry run)"
    } else {
        "Ingest Summary"
    };
    println!("\n{}", title.bright_green().bold());

    for report in &summary.datasets {
        println!("  {}", format_dataset_line(report));
    }

    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(summary.processing_time).to_string().bright_white()
    );
    if summary.failed_count() > 0 {
        println!(
            "  {} {}",
            "Datasets failed:".bright_red(),
            summary.failed_count().to_string().bright_red().bold()
        );
    }
    println!();
}

/// Generate JSON report for machine consumption
fn generate_json_report(summary: &RunSummary) -> Result<()> {
    let json_summary = serde_json::json!({
        "command": summary.command,
        "dry_run": summary.dry_run,
        "total_parsed": summary.total_parsed(),
        "total_skipped": summary.total_skipped(),
        "processing_time_seconds": summary.processing_time.as_secs_f64(),
        "datasets": summary.datasets,
    });

    let rendered = serde_json::to_string_pretty(&json_summary)
        .map_err(|e| Error::data_validation(format!("Failed to render JSON summary: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::ingest_pipeline::IngestStats;
    use crate::app::services::record_sink::SinkError;
    use crate::constants::DATASET_SIGNS_CSV;
    use tempfile::TempDir;

    const SIGNS: &str = "\
ParkingZone,Restriction_Days,Time_Restrictions_Start,Time_Restrictions_Finish,Restriction_Display
7001,Mon-Fri,07:30:00,18:30:00,2P
7001,Sat-Sun,07:30:00,12:30:00,2P
";

    fn completed(parsed: usize, skipped: usize) -> IngestOutcome {
        let mut stats = IngestStats::new("signs");
        stats.records_parsed = parsed;
        stats.records_skipped = skipped;
        stats.total_records = parsed + skipped;
        IngestOutcome::Completed(stats)
    }

    #[test]
    fn test_run_summary_totals() {
        let summary = RunSummary {
            command: "static".to_string(),
            datasets: vec![
                DatasetReport::completed("signs", "Signs", completed(10, 2)),
                DatasetReport::completed(
                    "bays",
                    "Bays",
                    IngestOutcome::NotFound {
                        path: "bays.csv".into(),
                    },
                ),
                DatasetReport::failed("zone-streets", "Zone to street", &Error::invalid_day("Fry", "Mon-Fry")),
            ],
            ..Default::default()
        };

        assert_eq!(summary.total_parsed(), 10);
        assert_eq!(summary.total_skipped(), 2);
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.datasets[0].parsed_count(), Some(10));
        assert_eq!(summary.datasets[1].parsed_count(), Some(-1));
        assert_eq!(summary.datasets[2].parsed_count(), None);
    }

    #[test]
    fn test_dataset_line_mentions_count() {
        colored::control::set_override(false);

        let line = format_dataset_line(&DatasetReport::completed("signs", "Signs", completed(1234, 0)));
        assert_eq!(line, "Signs parsed: 1234");

        let line = format_dataset_line(&DatasetReport::completed(
            "bays",
            "Bays",
            IngestOutcome::NotFound {
                path: "bays.csv".into(),
            },
        ));
        assert_eq!(line, "Bays parsed: -1 (not found: bays.csv)");
    }

    #[test]
    fn test_is_critical_error() {
        assert!(is_critical_error(&Error::configuration("test")));
        assert!(is_critical_error(&Error::Sink(SinkError::Closed)));

        assert!(!is_critical_error(&Error::invalid_day("Fry", "Mon-Fry")));
        assert!(!is_critical_error(&Error::missing_columns("signs.csv", vec![])));
    }

    #[test]
    fn test_run_static_reports_each_dataset() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(DATASET_SIGNS_CSV), SIGNS).unwrap();

        let config = IngestConfig::default()
            .with_data_dir(temp_dir.path())
            .with_dry_run();
        let mut sink = MemorySink::new();

        let summary = run_static(&config, &mut sink, &mut ProgressReporter::hidden());

        let counts: Vec<Option<i64>> = summary
            .datasets
            .iter()
            .map(DatasetReport::parsed_count)
            .collect();
        assert_eq!(counts, vec![Some(2), Some(-1), Some(-1), Some(-1)]);
        assert_eq!(summary.failed_count(), 0);
        assert_eq!(sink.total_len(), 2);
    }

    #[test]
    fn test_run_static_missing_data_dir_reports_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let config = IngestConfig::default()
            .with_data_dir(temp_dir.path().join("not-downloaded"))
            .with_dry_run();
        let mut sink = MemorySink::new();

        let summary = run_static(&config, &mut sink, &mut ProgressReporter::hidden());

        let counts: Vec<Option<i64>> = summary
            .datasets
            .iter()
            .map(DatasetReport::parsed_count)
            .collect();
        assert_eq!(counts, vec![Some(-1); 4]);
        assert_eq!(summary.failed_count(), 0);
    }

    #[test]
    fn test_filter_directive_uses_configured_level() {
        let config = IngestConfig::default().with_log_level("debug");
        assert_eq!(filter_directive(&config.logging), "parking_ingest=debug");
    }

    #[test]
    fn test_critical_error_stops_remaining_datasets() {
        struct ClosedSink;
        impl RecordSink for ClosedSink {
            fn insert(
                &mut self,
                _table: &str,
                _record: &crate::NormalizedRecord,
            ) -> std::result::Result<(), SinkError> {
                Err(SinkError::Closed)
            }
        }

        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(DATASET_SIGNS_CSV), SIGNS).unwrap();
        let config = IngestConfig::default().with_data_dir(temp_dir.path());

        let summary = run_static(&config, &mut ClosedSink, &mut ProgressReporter::hidden());

        assert_eq!(summary.datasets.len(), 4);
        assert_eq!(summary.failed_count(), 4);
        assert!(
            summary.datasets[1]
                .error
                .as_deref()
                .unwrap()
                .contains("Not attempted")
        );
    }

    #[test]
    fn test_open_sink_dry_run_uses_memory() {
        let config = IngestConfig::default()
            .with_database_path("")
            .with_dry_run();
        assert!(open_sink(&config).is_ok());
    }

    #[test]
    fn test_open_sink_creates_database() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db").join("parking.sqlite3");
        let config = IngestConfig::default().with_database_path(&path);

        let mut sink = open_sink(&config).unwrap();
        sink.close().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_json_report_renders() {
        let summary = RunSummary {
            command: "realtime".to_string(),
            datasets: vec![DatasetReport::completed("realtime", "Realtime", completed(3, 0))],
            ..Default::default()
        };
        assert!(generate_json_report(&summary).is_ok());

        let value = serde_json::to_value(&summary.datasets[0]).unwrap();
        assert_eq!(value["outcome"]["status"], "completed");
        assert_eq!(value["outcome"]["records_parsed"], 3);
        assert!(value.get("error").is_none());
    }
}
