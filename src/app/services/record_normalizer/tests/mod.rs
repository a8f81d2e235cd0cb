//! Test utilities for record normalization
//!
//! Headers here mirror the published City of Melbourne exports.

use crate::app::models::RawRecord;
use crate::app::services::record_normalizer::ColumnMapping;
use serde_json::json;

mod column_mapping_tests;

pub const SIGNS_HEADER: &[&str] = &[
    "ParkingZone",
    "Restriction_Days",
    "Time_Restrictions_Start",
    "Time_Restrictions_Finish",
    "Restriction_Display",
];

pub const ZONE_STREETS_HEADER: &[&str] =
    &["ParkingZone", "OnStreet", "StreetFrom", "StreetTo", "Segment_ID"];

pub const BAYS_HEADER: &[&str] = &[
    "RoadSegmentID",
    "KerbsideID",
    "RoadSegmentDescription",
    "Latitude",
    "Longitude",
    "LastUpdated",
    "Location",
];

pub const POPULATION_HEADER: &[&str] = &["geography", "year", "gender", "age", "value"];

pub fn mapping(header: &[&str]) -> ColumnMapping {
    ColumnMapping::analyze(header)
}

pub fn row(values: &[&str]) -> RawRecord {
    RawRecord::from_values(2, values)
}

/// Sensor record shaped like the live feed
pub fn sensor_record() -> crate::app::models::RawSensorRecord {
    let value = json!({
        "lastupdated": "2025-03-14T03:12:45+00:00",
        "status_timestamp": "2025-03-14T02:58:10+00:00",
        "zone_number": 7550,
        "status_description": "Present",
        "kerbsideid": 22959,
        "location": {"lon": 144.9586, "lat": -37.8136}
    });

    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!("fixture is an object"),
    }
}
