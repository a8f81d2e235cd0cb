//! Normalization of realtime bay sensor records

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::app::models::{RawSensorRecord, RecordOutcome, SensorReading, SkipReason};
use crate::constants::{NAIVE_TIMESTAMP_FORMATS, STATUS_PRESENT, realtime_fields as fields};
use crate::{Error, Result};

/// Normalize one sensor record from the feed
///
/// - `location` is dropped; bay geometry comes from the static bays dataset
/// - `lastupdated` and `status_timestamp` are parsed as ISO-8601; a malformed
///   value is an error for the whole feed
/// - `status_description == "Present"` becomes `presented = true`; every other
///   value, including unknown statuses and a missing field, reads as `false`
/// - `kerbsideid` becomes the bay id; records without one are skipped since
///   the bay id is half of the reading's key
///
/// All other fields are kept in [`SensorReading::attributes`].
pub fn normalize_sensor_record(raw: &RawSensorRecord) -> Result<RecordOutcome<SensorReading>> {
    let mut attributes: BTreeMap<String, Value> = raw
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    attributes.remove(fields::LOCATION);

    let Some(bay_id) = attributes.remove(fields::KERBSIDE_ID).and_then(value_as_text) else {
        return Ok(RecordOutcome::Skipped(SkipReason::MissingField {
            column: fields::KERBSIDE_ID.to_string(),
        }));
    };

    let last_updated = match timestamp_field(&mut attributes, fields::LAST_UPDATED)? {
        RecordOutcome::Accepted(timestamp) => timestamp,
        RecordOutcome::Skipped(reason) => return Ok(RecordOutcome::Skipped(reason)),
    };
    let status_timestamp = match timestamp_field(&mut attributes, fields::STATUS_TIMESTAMP)? {
        RecordOutcome::Accepted(timestamp) => timestamp,
        RecordOutcome::Skipped(reason) => return Ok(RecordOutcome::Skipped(reason)),
    };

    let zone_number = attributes
        .remove(fields::ZONE_NUMBER)
        .and_then(|value| match value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        });

    let presented = matches!(
        attributes.remove(fields::STATUS_DESCRIPTION),
        Some(Value::String(status)) if status == STATUS_PRESENT
    );

    Ok(RecordOutcome::Accepted(SensorReading {
        bay_id,
        zone_number,
        last_updated,
        status_timestamp,
        presented,
        attributes,
    }))
}

/// Parse an ISO-8601 timestamp
///
/// Values with an offset are kept in that offset. Values without one are
/// taken as UTC.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<FixedOffset>> {
    let value = value.trim();

    DateTime::parse_from_rfc3339(value).or_else(|rfc3339_error| {
        NAIVE_TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .map(|naive| naive.and_utc().fixed_offset())
            .ok_or_else(|| Error::datetime_parsing(field, value, rfc3339_error))
    })
}

fn timestamp_field(
    attributes: &mut BTreeMap<String, Value>,
    field: &str,
) -> Result<RecordOutcome<DateTime<FixedOffset>>> {
    match attributes.remove(field) {
        Some(Value::String(text)) => parse_timestamp(field, &text).map(RecordOutcome::Accepted),
        Some(Value::Null) | None => Ok(RecordOutcome::Skipped(SkipReason::MissingField {
            column: field.to_string(),
        })),
        Some(other) => Ok(RecordOutcome::Skipped(SkipReason::InvalidValue {
            column: field.to_string(),
            value: other.to_string(),
        })),
    }
}

fn value_as_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
