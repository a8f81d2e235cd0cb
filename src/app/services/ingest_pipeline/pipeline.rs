//! Static and realtime ingestion runs

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::progress::ProgressReporter;
use super::stats::IngestStats;
use crate::app::models::{NormalizedRecord, RawSensorRecord, RecordOutcome, StaticDataset};
use crate::app::services::record_normalizer::{normalize_sensor_record, normalize_static};
use crate::app::services::record_sink::RecordSink;
use crate::app::services::source_reader::{CsvSource, HttpSource};
use crate::constants::tables;
use crate::{Error, Result};

/// Dataset name used for realtime statistics
pub const REALTIME_DATASET: &str = "realtime";

/// How a dataset run ended, short of a hard error
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// The source file does not exist
    NotFound { path: PathBuf },

    /// Every record was read and either stored or skipped
    Completed(IngestStats),
}

impl IngestOutcome {
    /// Records stored, or `-1` when the source was not found
    pub fn parsed_count(&self) -> i64 {
        match self {
            IngestOutcome::NotFound { .. } => -1,
            IngestOutcome::Completed(stats) => stats.records_parsed as i64,
        }
    }

    pub fn stats(&self) -> Option<&IngestStats> {
        match self {
            IngestOutcome::NotFound { .. } => None,
            IngestOutcome::Completed(stats) => Some(stats),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, IngestOutcome::NotFound { .. })
    }
}

/// Ingest one static CSV dataset into `sink`
///
/// # Errors
///
/// Aborts on [`Error::MissingColumns`] when the header lacks a required
/// column, and on any hard normalization or sink error. Records stored before
/// the error stay stored.
pub fn ingest_static(
    dataset: StaticDataset,
    path: &Path,
    sink: &mut dyn RecordSink,
    progress: &mut ProgressReporter,
) -> Result<IngestOutcome> {
    info!("Ingesting {} from {}", dataset.label(), path.display());

    let Some(source) = CsvSource::open(path)? else {
        warn!("{} not found: {}", dataset.label(), path.display());
        return Ok(IngestOutcome::NotFound {
            path: path.to_path_buf(),
        });
    };

    let missing = source.mapping().missing_columns(dataset.required_columns());
    if !missing.is_empty() {
        return Err(Error::missing_columns(path.display().to_string(), missing));
    }

    progress.start_bytes(source.file_len(), dataset.label());
    match ingest_csv_records(dataset, source, sink, progress) {
        Ok(stats) => {
            progress.finish(&stats);
            log_summary(&stats);
            Ok(IngestOutcome::Completed(stats))
        }
        Err(e) => {
            progress.finish_with_error(&e.to_string());
            Err(e)
        }
    }
}

fn ingest_csv_records(
    dataset: StaticDataset,
    mut source: CsvSource,
    sink: &mut dyn RecordSink,
    progress: &ProgressReporter,
) -> Result<IngestStats> {
    let mapping = source.mapping().clone();
    let mut stats = IngestStats::new(dataset.name());

    while let Some(item) = source.next() {
        match item? {
            RecordOutcome::Accepted(raw) => match normalize_static(dataset, &raw, &mapping)? {
                RecordOutcome::Accepted(record) => {
                    sink.insert(dataset.table(), &record)?;
                    stats.record_parsed();
                }
                RecordOutcome::Skipped(reason) => {
                    debug!("Skipped {} line {}: {}", dataset, raw.line, reason);
                    stats.record_skip(&reason);
                }
            },
            RecordOutcome::Skipped(reason) => stats.record_skip(&reason),
        }

        progress.set_position(source.bytes_read());
    }

    Ok(stats)
}

/// Fetch the realtime feed once and ingest every record into `sink`
pub async fn ingest_realtime(
    source: &HttpSource,
    sink: &mut dyn RecordSink,
    progress: &mut ProgressReporter,
) -> Result<IngestOutcome> {
    let records = source.fetch().await?;
    info!("Fetched {} realtime records", records.len());

    ingest_sensor_records(&records, sink, progress).map(IngestOutcome::Completed)
}

/// Normalize and store already fetched sensor records
pub fn ingest_sensor_records(
    records: &[RawSensorRecord],
    sink: &mut dyn RecordSink,
    progress: &mut ProgressReporter,
) -> Result<IngestStats> {
    let mut stats = IngestStats::new(REALTIME_DATASET);
    progress.start_records(records.len() as u64, "Realtime");

    for (index, raw) in records.iter().enumerate() {
        let outcome = normalize_sensor_record(raw).and_then(|outcome| match outcome {
            RecordOutcome::Accepted(reading) => {
                sink.insert(tables::SENSOR_READINGS, &NormalizedRecord::from(reading))?;
                stats.record_parsed();
                Ok(())
            }
            RecordOutcome::Skipped(reason) => {
                debug!("Skipped realtime record {}: {}", index, reason);
                stats.record_skip(&reason);
                Ok(())
            }
        });

        if let Err(e) = outcome {
            progress.finish_with_error(&e.to_string());
            return Err(e);
        }
        progress.inc(1);
    }

    progress.finish(&stats);
    log_summary(&stats);
    Ok(stats)
}

fn log_summary(stats: &IngestStats) {
    info!(
        "{}: {} parsed, {} skipped of {} records ({:.1}%)",
        stats.dataset,
        stats.records_parsed,
        stats.records_skipped,
        stats.total_records,
        stats.success_rate()
    );

    if stats.total_records > 0 && !stats.is_successful() {
        warn!(
            "{}: low success rate, skips by reason: {:?}",
            stats.dataset, stats.skip_reasons
        );
    }
}
