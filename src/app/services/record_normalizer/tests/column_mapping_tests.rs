//! Tests for header analysis

use super::*;

#[test]
fn test_lookup_ignores_case_and_punctuation() {
    let mapping = mapping(SIGNS_HEADER);

    assert_eq!(mapping.get_index("ParkingZone"), Some(0));
    assert_eq!(mapping.get_index("parking_zone"), Some(0));
    assert_eq!(mapping.get_index("Parking Zone"), Some(0));
    assert_eq!(mapping.get_index("restrictiondays"), Some(1));
    assert_eq!(mapping.get_index("Kerbside_ID"), None);
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let mapping = ColumnMapping::analyze(["\u{feff}geography", "year"]);
    assert!(mapping.has_column("geography"));
    assert_eq!(mapping.columns[0], "\u{feff}geography");
}

#[test]
fn test_first_duplicate_column_wins() {
    let mapping = ColumnMapping::analyze(["Segment_ID", "SegmentID"]);
    assert_eq!(mapping.get_index("segment_id"), Some(0));
    assert_eq!(mapping.len(), 2);
}

#[test]
fn test_missing_columns() {
    let mapping = ColumnMapping::analyze(["ParkingZone", "OnStreet"]);
    let missing = mapping.missing_columns(&["ParkingZone", "StreetFrom", "Segment_ID"]);
    assert_eq!(missing, vec!["StreetFrom".to_string(), "Segment_ID".to_string()]);
}

#[test]
fn test_header_cells_are_trimmed() {
    let mapping = ColumnMapping::analyze([" year ", "value\r"]);
    assert_eq!(mapping.columns, vec!["year".to_string(), "value".to_string()]);
}
