//! Field parsing utilities for raw records
//!
//! Failures here are row-level problems, so they come back as a [`SkipReason`]
//! rather than a crate error.

use super::column_mapping::ColumnMapping;
use crate::app::models::{RawRecord, SkipReason};
use crate::constants::{DATE_FORMATS, TIME_OF_DAY_FORMATS};
use chrono::{NaiveDate, NaiveTime};
use std::str::FromStr;

/// Result of extracting one field
pub type FieldResult<T> = std::result::Result<T, SkipReason>;

/// Get a required, non-empty field value
pub fn get_required_field<'a>(
    record: &'a RawRecord,
    mapping: &ColumnMapping,
    column: &str,
) -> FieldResult<&'a str> {
    get_optional_field(record, mapping, column).ok_or_else(|| SkipReason::MissingField {
        column: column.to_string(),
    })
}

/// Get an optional field value; empty values read as absent
pub fn get_optional_field<'a>(
    record: &'a RawRecord,
    mapping: &ColumnMapping,
    column: &str,
) -> Option<&'a str> {
    mapping
        .get_index(column)
        .and_then(|index| record.get(index))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Text field that may be blank; blank reads as an empty string
pub fn parse_text(record: &RawRecord, mapping: &ColumnMapping, column: &str) -> String {
    get_optional_field(record, mapping, column)
        .unwrap_or_default()
        .to_string()
}

/// Text field where blank reads as absent
pub fn parse_optional_text(
    record: &RawRecord,
    mapping: &ColumnMapping,
    column: &str,
) -> Option<String> {
    get_optional_field(record, mapping, column).map(str::to_string)
}

/// Parse a required field through its `FromStr` implementation
pub fn parse_required<T: FromStr>(
    record: &RawRecord,
    mapping: &ColumnMapping,
    column: &str,
) -> FieldResult<T> {
    let value = get_required_field(record, mapping, column)?;
    value.parse::<T>().map_err(|_| invalid_value(column, value))
}

/// Parse an optional field; present but uncoercible values still skip the row
pub fn parse_optional<T: FromStr>(
    record: &RawRecord,
    mapping: &ColumnMapping,
    column: &str,
) -> FieldResult<Option<T>> {
    get_optional_field(record, mapping, column)
        .map(|value| value.parse::<T>().map_err(|_| invalid_value(column, value)))
        .transpose()
}

/// Parse a required time of day (`HH:MM:SS` or `HH:MM`)
pub fn parse_required_time(
    record: &RawRecord,
    mapping: &ColumnMapping,
    column: &str,
) -> FieldResult<NaiveTime> {
    let value = get_required_field(record, mapping, column)?;

    TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .ok_or_else(|| invalid_value(column, value))
}

/// Parse an optional calendar date (`YYYY-MM-DD` or `DD/MM/YYYY`)
pub fn parse_optional_date(
    record: &RawRecord,
    mapping: &ColumnMapping,
    column: &str,
) -> FieldResult<Option<NaiveDate>> {
    get_optional_field(record, mapping, column)
        .map(|value| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .ok_or_else(|| invalid_value(column, value))
        })
        .transpose()
}

/// Parse a required coordinate and check it lies within `-limit..=limit`
pub fn parse_required_coordinate(
    record: &RawRecord,
    mapping: &ColumnMapping,
    column: &str,
    limit: f64,
) -> FieldResult<f64> {
    let value = get_required_field(record, mapping, column)?;
    value
        .parse::<f64>()
        .ok()
        .filter(|coordinate| (-limit..=limit).contains(coordinate))
        .ok_or_else(|| invalid_value(column, value))
}

fn invalid_value(column: &str, value: &str) -> SkipReason {
    SkipReason::InvalidValue {
        column: column.to_string(),
        value: value.to_string(),
    }
}
