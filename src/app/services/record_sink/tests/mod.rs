//! Test fixtures for record sinks

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde_json::json;
use std::collections::BTreeMap;

use crate::app::models::{
    NormalizedRecord, ParkingBay, PopulationForecast, SensorReading, SignPlate, ZoneStreetLink,
};
use crate::encode_days;

mod sqlite_tests;

pub fn sensor_reading(bay_id: &str, minute: u32, presented: bool) -> NormalizedRecord {
    let at = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 3, 14, 3, minute, 0)
        .unwrap();
    let mut attributes = BTreeMap::new();
    attributes.insert("source".to_string(), json!("test"));

    SensorReading {
        bay_id: bay_id.to_string(),
        zone_number: Some(7550),
        last_updated: at,
        status_timestamp: at,
        presented,
        attributes,
    }
    .into()
}

pub fn sign_plate(display: &str) -> NormalizedRecord {
    SignPlate {
        parking_zone: 7001,
        days: encode_days("Mon-Fri").unwrap(),
        start_time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        finish_time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
        display: display.to_string(),
    }
    .into()
}

pub fn zone_street_link(on_street: &str) -> NormalizedRecord {
    ZoneStreetLink {
        parking_zone: 7001,
        on_street: Some(on_street.to_string()),
        street_from: Some("Swanston Street".to_string()),
        street_to: Some("Russell Street".to_string()),
        segment_id: 20184,
    }
    .into()
}

pub fn parking_bay() -> NormalizedRecord {
    ParkingBay {
        road_segment_id: Some(22730),
        kerbside_id: None,
        description: Some("Queen Street between Flinders Lane and Collins Street".to_string()),
        latitude: -37.81695,
        longitude: 144.96128,
        last_updated: NaiveDate::from_ymd_opt(2023, 10, 4),
    }
    .into()
}

pub fn population_forecast(value: Option<f64>) -> NormalizedRecord {
    PopulationForecast {
        geography: "Carlton".to_string(),
        year: 2031,
        gender: "Female".to_string(),
        age: "Age 25-29".to_string(),
        value,
    }
    .into()
}
