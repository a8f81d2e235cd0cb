//! Ingestion statistics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::app::models::SkipReason;
use crate::constants::SUCCESS_RATE_THRESHOLD;

/// Counts for one dataset run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Dataset name (`realtime`, `signs`, ...)
    pub dataset: String,

    /// Data records encountered, parsed or not
    pub total_records: usize,

    /// Records normalized and accepted by the sink
    pub records_parsed: usize,

    /// Records skipped without aborting the run
    pub records_skipped: usize,

    /// Skipped records by reason kind
    pub skip_reasons: BTreeMap<String, usize>,
}

impl IngestStats {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            ..Self::default()
        }
    }

    /// Count a record the sink accepted
    pub fn record_parsed(&mut self) {
        self.total_records += 1;
        self.records_parsed += 1;
    }

    /// Count a skipped record under its reason
    pub fn record_skip(&mut self, reason: &SkipReason) {
        self.total_records += 1;
        self.records_skipped += 1;
        *self
            .skip_reasons
            .entry(reason.kind().to_string())
            .or_insert(0) += 1;
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.total_records as f64) * 100.0
        }
    }

    /// Check if ingestion was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > SUCCESS_RATE_THRESHOLD
    }
}
