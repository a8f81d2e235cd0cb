//! Tests for the SQLite sink

use super::*;
use crate::app::services::record_sink::{RecordSink, SinkError, SqliteSink};
use crate::constants::tables;

fn insert(sink: &mut SqliteSink, record: &NormalizedRecord) {
    sink.insert(record.table(), record).unwrap();
}

#[test]
fn test_tables_are_created() {
    let sink = SqliteSink::open_in_memory().unwrap();

    for table in crate::app::services::record_sink::KNOWN_TABLES {
        assert_eq!(sink.row_count(table).unwrap(), 0, "table {}", table);
    }
    assert!(sink.path().is_none());
}

#[test]
fn test_every_record_kind_is_stored() {
    let mut sink = SqliteSink::open_in_memory().unwrap();

    insert(&mut sink, &sensor_reading("22959", 12, true));
    insert(&mut sink, &sign_plate("2P"));
    insert(&mut sink, &zone_street_link("Lonsdale Street"));
    insert(&mut sink, &parking_bay());
    insert(&mut sink, &population_forecast(Some(1520.4)));

    assert_eq!(sink.row_count(tables::SENSOR_READINGS).unwrap(), 1);
    assert_eq!(sink.row_count(tables::SIGN_PLATES).unwrap(), 1);
    assert_eq!(sink.row_count(tables::ZONE_STREET_LINKS).unwrap(), 1);
    assert_eq!(sink.row_count(tables::PARKING_BAYS).unwrap(), 1);
    assert_eq!(sink.row_count(tables::POPULATION_FORECASTS).unwrap(), 1);

    let days: i64 = sink
        .connection()
        .unwrap()
        .query_row("SELECT days FROM sign_plates", [], |row| row.get(0))
        .unwrap();
    assert_eq!(days, 0b0111110);

    let presented: bool = sink
        .connection()
        .unwrap()
        .query_row("SELECT presented FROM sensor_readings", [], |row| row.get(0))
        .unwrap();
    assert!(presented);
}

#[test]
fn test_repeated_sensor_reading_is_ignored() {
    let mut sink = SqliteSink::open_in_memory().unwrap();

    insert(&mut sink, &sensor_reading("22959", 12, true));
    insert(&mut sink, &sensor_reading("22959", 12, false));
    insert(&mut sink, &sensor_reading("22959", 13, false));

    assert_eq!(sink.row_count(tables::SENSOR_READINGS).unwrap(), 2);

    // The first reading for a key wins
    let presented: bool = sink
        .connection()
        .unwrap()
        .query_row(
            "SELECT presented FROM sensor_readings WHERE last_updated = ?1",
            ["2025-03-14T03:12:00+00:00"],
            |row| row.get(0),
        )
        .unwrap();
    assert!(presented);
}

#[test]
fn test_static_rows_are_replaced_on_rerun() {
    let mut sink = SqliteSink::open_in_memory().unwrap();

    insert(&mut sink, &population_forecast(Some(1.0)));
    insert(&mut sink, &population_forecast(Some(2.0)));
    insert(&mut sink, &zone_street_link("Lonsdale Street"));
    insert(&mut sink, &zone_street_link("Lonsdale St"));

    assert_eq!(sink.row_count(tables::POPULATION_FORECASTS).unwrap(), 1);
    assert_eq!(sink.row_count(tables::ZONE_STREET_LINKS).unwrap(), 1);

    let value: f64 = sink
        .connection()
        .unwrap()
        .query_row("SELECT value FROM population_forecasts", [], |row| row.get(0))
        .unwrap();
    assert_eq!(value, 2.0);
}

#[test]
fn test_null_forecast_value_is_stored() {
    let mut sink = SqliteSink::open_in_memory().unwrap();
    insert(&mut sink, &population_forecast(None));

    let value: Option<f64> = sink
        .connection()
        .unwrap()
        .query_row("SELECT value FROM population_forecasts", [], |row| row.get(0))
        .unwrap();
    assert_eq!(value, None);
}

#[test]
fn test_mismatched_table_is_rejected() {
    let mut sink = SqliteSink::open_in_memory().unwrap();
    let result = sink.insert(tables::SENSOR_READINGS, &parking_bay());

    assert!(matches!(result, Err(SinkError::TableMismatch { .. })));
    assert_eq!(sink.row_count(tables::SENSOR_READINGS).unwrap(), 0);
    assert!(matches!(
        sink.row_count("sqlite_master"),
        Err(SinkError::UnknownTable(_))
    ));
}

#[test]
fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("parking.sqlite3");

    let mut sink = SqliteSink::open(&path).unwrap();
    assert_eq!(sink.path(), Some(path.as_path()));
    insert(&mut sink, &sign_plate("2P"));
    sink.close().unwrap();

    assert!(matches!(
        sink.insert(tables::SIGN_PLATES, &sign_plate("1P")),
        Err(SinkError::Closed)
    ));

    let reopened = SqliteSink::open(&path).unwrap();
    assert_eq!(reopened.row_count(tables::SIGN_PLATES).unwrap(), 1);
}
