//! Progress reporting for ingestion runs

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use super::stats::IngestStats;

const BYTES_TEMPLATE: &str =
    "{spinner:.green} {prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) | {msg}";
const RECORDS_TEMPLATE: &str =
    "{spinner:.green} {prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records ({percent}%) | {msg}";

/// Progress bar for one dataset at a time
///
/// A disabled reporter never draws anything, which keeps quiet mode and tests
/// free of terminal output.
#[derive(Debug)]
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            progress_bar: None,
            enabled,
        }
    }

    /// Reporter that never draws
    pub fn hidden() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start a bar measured in bytes of input file
    pub fn start_bytes(&mut self, total_bytes: u64, label: &str) {
        self.start(total_bytes, BYTES_TEMPLATE, label);
    }

    /// Start a bar measured in records
    pub fn start_records(&mut self, total_records: u64, label: &str) {
        self.start(total_records, RECORDS_TEMPLATE, label);
    }

    fn start(&mut self, total: u64, template: &str, label: &str) {
        let pb = if self.enabled {
            ProgressBar::new(total)
        } else {
            ProgressBar::hidden()
        };
        pb.set_length(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb.set_prefix(label.to_string());

        debug!("Progress bar started for {} (total {})", label, total);
        self.progress_bar = Some(pb);
    }

    pub fn set_position(&self, position: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_position(position);
        }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Current position of the active bar, 0 when none is running
    pub fn position(&self) -> u64 {
        self.progress_bar.as_ref().map(ProgressBar::position).unwrap_or(0)
    }

    /// Finish the active bar with a summary of the run
    pub fn finish(&mut self, stats: &IngestStats) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_with_message(format!(
                "{} parsed, {} skipped",
                stats.records_parsed, stats.records_skipped
            ));
        }
    }

    /// Abandon the active bar after a hard error
    pub fn finish_with_error(&mut self, error_message: &str) {
        if let Some(pb) = self.progress_bar.take() {
            pb.abandon_with_message(format!("Failed: {}", error_message));
            debug!("Progress reporting finished with error: {}", error_message);
        }
    }

    /// Run `f` with the bar cleared so log lines print cleanly
    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        match self.progress_bar {
            Some(ref pb) => pb.suspend(f),
            None => f(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::hidden()
    }
}
