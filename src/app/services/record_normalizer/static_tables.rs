//! Normalization of rows from the static reference CSV exports

use tracing::trace;

use super::column_mapping::ColumnMapping;
use super::field_parsers::{
    get_optional_field, parse_optional, parse_optional_date, parse_optional_text, parse_required,
    parse_required_coordinate, parse_required_time, parse_text,
};
use crate::Result;
use crate::app::models::{
    NormalizedRecord, ParkingBay, PopulationForecast, RawRecord, RecordOutcome, SignPlate,
    SkipReason, StaticDataset, ZoneStreetLink,
};
use crate::app::services::day_encoder::encode_days;
use crate::constants::columns;

/// Unwrap a field result or skip the whole row
macro_rules! field {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(reason) => return Ok(RecordOutcome::Skipped(reason)),
        }
    };
}

/// Skip reason for a row whose field count differs from the header's
pub fn check_field_count(record: &RawRecord, mapping: &ColumnMapping) -> Option<SkipReason> {
    (record.field_count() != mapping.len()).then(|| SkipReason::FieldCountMismatch {
        expected: mapping.len(),
        found: record.field_count(),
    })
}

/// Normalize one row of any static dataset
pub fn normalize_static(
    dataset: StaticDataset,
    record: &RawRecord,
    mapping: &ColumnMapping,
) -> Result<RecordOutcome<NormalizedRecord>> {
    let outcome: RecordOutcome<NormalizedRecord> = match dataset {
        StaticDataset::Signs => normalize_sign_plate(record, mapping)?.map(Into::into),
        StaticDataset::ZoneStreets => normalize_zone_street_link(record, mapping)?.map(Into::into),
        StaticDataset::Bays => normalize_parking_bay(record, mapping)?.map(Into::into),
        StaticDataset::PopulationForecasts => {
            normalize_population_forecast(record, mapping)?.map(Into::into)
        }
    };

    if let RecordOutcome::Skipped(reason) = &outcome {
        trace!("{} line {} skipped: {}", dataset, record.line, reason);
    }

    Ok(outcome)
}

/// Normalize a sign plate row, encoding `Restriction_Days` as a day mask
///
/// An unrecognized day is a hard error: mis-encoding a legal restriction
/// window is worse than stopping.
pub fn normalize_sign_plate(
    record: &RawRecord,
    mapping: &ColumnMapping,
) -> Result<RecordOutcome<SignPlate>> {
    if let Some(reason) = check_field_count(record, mapping) {
        return Ok(RecordOutcome::Skipped(reason));
    }

    let parking_zone = field!(parse_required::<u32>(record, mapping, columns::PARKING_ZONE));
    let days_spec = get_optional_field(record, mapping, columns::RESTRICTION_DAYS).unwrap_or("");
    let days = encode_days(days_spec)?;
    let start_time = field!(parse_required_time(
        record,
        mapping,
        columns::TIME_RESTRICTIONS_START
    ));
    let finish_time = field!(parse_required_time(
        record,
        mapping,
        columns::TIME_RESTRICTIONS_FINISH
    ));
    let display = parse_text(record, mapping, columns::RESTRICTION_DISPLAY);

    Ok(RecordOutcome::Accepted(SignPlate {
        parking_zone,
        days,
        start_time,
        finish_time,
        display,
    }))
}

/// Normalize a zone to street segment row
///
/// Only the zone and segment ids are required; street names may be blank.
pub fn normalize_zone_street_link(
    record: &RawRecord,
    mapping: &ColumnMapping,
) -> Result<RecordOutcome<ZoneStreetLink>> {
    if let Some(reason) = check_field_count(record, mapping) {
        return Ok(RecordOutcome::Skipped(reason));
    }

    Ok(RecordOutcome::Accepted(ZoneStreetLink {
        parking_zone: field!(parse_required(record, mapping, columns::PARKING_ZONE)),
        on_street: parse_optional_text(record, mapping, columns::ON_STREET),
        street_from: parse_optional_text(record, mapping, columns::STREET_FROM),
        street_to: parse_optional_text(record, mapping, columns::STREET_TO),
        segment_id: field!(parse_required(record, mapping, columns::SEGMENT_ID)),
    }))
}

/// Normalize a parking bay row
///
/// Only the identifying and positional columns are kept; the quoted
/// `Location` pair duplicates latitude and longitude.
pub fn normalize_parking_bay(
    record: &RawRecord,
    mapping: &ColumnMapping,
) -> Result<RecordOutcome<ParkingBay>> {
    if let Some(reason) = check_field_count(record, mapping) {
        return Ok(RecordOutcome::Skipped(reason));
    }

    Ok(RecordOutcome::Accepted(ParkingBay {
        road_segment_id: field!(parse_optional(record, mapping, columns::ROAD_SEGMENT_ID)),
        kerbside_id: parse_optional_text(record, mapping, columns::KERBSIDE_ID),
        description: parse_optional_text(record, mapping, columns::ROAD_SEGMENT_DESCRIPTION),
        latitude: field!(parse_required_coordinate(
            record,
            mapping,
            columns::LATITUDE,
            90.0
        )),
        longitude: field!(parse_required_coordinate(
            record,
            mapping,
            columns::LONGITUDE,
            180.0
        )),
        last_updated: field!(parse_optional_date(record, mapping, columns::LAST_UPDATED)),
    }))
}

pub fn normalize_population_forecast(
    record: &RawRecord,
    mapping: &ColumnMapping,
) -> Result<RecordOutcome<PopulationForecast>> {
    if let Some(reason) = check_field_count(record, mapping) {
        return Ok(RecordOutcome::Skipped(reason));
    }

    Ok(RecordOutcome::Accepted(PopulationForecast {
        geography: parse_text(record, mapping, columns::GEOGRAPHY),
        year: field!(parse_required(record, mapping, columns::YEAR)),
        gender: parse_text(record, mapping, columns::GENDER),
        age: parse_text(record, mapping, columns::AGE),
        value: field!(parse_optional(record, mapping, columns::VALUE)),
    }))
}
