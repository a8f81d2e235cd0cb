//! Tests for the progress reporter

use crate::app::services::ingest_pipeline::{IngestStats, ProgressReporter};

#[test]
fn test_hidden_reporter_tracks_position() {
    let mut progress = ProgressReporter::hidden();
    assert!(!progress.is_enabled());
    assert_eq!(progress.position(), 0);

    progress.start_records(10, "Realtime");
    progress.inc(3);
    assert_eq!(progress.position(), 3);

    progress.set_position(7);
    assert_eq!(progress.position(), 7);

    progress.finish(&IngestStats::new("realtime"));
    assert_eq!(progress.position(), 0);
}

#[test]
fn test_finish_without_start_is_a_no_op() {
    let mut progress = ProgressReporter::default();
    progress.finish(&IngestStats::new("signs"));
    progress.finish_with_error("boom");
    assert_eq!(progress.suspend(|| 42), 42);
}
