//! Data models for parking ingestion
//!
//! This module contains the raw and normalized record types flowing through the
//! ingestion pipelines, the static dataset catalogue, and the skip decisions the
//! normalizer can return for malformed input.

use crate::app::services::day_encoder::DayMask;
use crate::constants::{self, columns, tables};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Raw Input
// =============================================================================

/// One data row of a delimited source, before any validation
///
/// Field names live once per source in a
/// [`ColumnMapping`](crate::app::services::record_normalizer::ColumnMapping);
/// the record only carries its values and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source file (header is line 1)
    pub line: u64,

    /// Field values in column order
    pub fields: Vec<String>,
}

impl RawRecord {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Build a record from borrowed values, handy for fixtures
    pub fn from_values(line: u64, values: &[&str]) -> Self {
        Self {
            line,
            fields: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

/// Realtime sensor record as delivered by the feed (one JSON object)
pub type RawSensorRecord = serde_json::Map<String, Value>;

// =============================================================================
// Skip Decisions
// =============================================================================

/// Why a record was dropped without aborting the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Field count differs from the header's
    FieldCountMismatch { expected: usize, found: usize },

    /// A required field is empty or absent
    MissingField { column: String },

    /// A field could not be coerced to its column type
    InvalidValue { column: String, value: String },

    /// The row could not be decoded at all (bad quoting or encoding)
    Unreadable { message: String },
}

impl SkipReason {
    /// Short stable name used to tally skips by kind
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::FieldCountMismatch { .. } => "field_count_mismatch",
            SkipReason::MissingField { .. } => "missing_field",
            SkipReason::InvalidValue { .. } => "invalid_value",
            SkipReason::Unreadable { .. } => "unreadable",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FieldCountMismatch { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            SkipReason::MissingField { column } => write!(f, "missing value for '{}'", column),
            SkipReason::InvalidValue { column, value } => {
                write!(f, "invalid value '{}' for '{}'", value, column)
            }
            SkipReason::Unreadable { message } => write!(f, "unreadable row: {}", message),
        }
    }
}

/// Result of normalizing one record that did not hit a hard error
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome<T> {
    Accepted(T),
    Skipped(SkipReason),
}

impl<T> RecordOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RecordOutcome<U> {
        match self {
            RecordOutcome::Accepted(value) => RecordOutcome::Accepted(f(value)),
            RecordOutcome::Skipped(reason) => RecordOutcome::Skipped(reason),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, RecordOutcome::Accepted(_))
    }

    pub fn accepted(self) -> Option<T> {
        match self {
            RecordOutcome::Accepted(value) => Some(value),
            RecordOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            RecordOutcome::Accepted(_) => None,
            RecordOutcome::Skipped(reason) => Some(reason),
        }
    }
}

// =============================================================================
// Static Dataset Catalogue
// =============================================================================

/// The four static reference datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaticDataset {
    Signs,
    ZoneStreets,
    Bays,
    PopulationForecasts,
}

impl StaticDataset {
    /// All static datasets in processing order
    pub const ALL: [StaticDataset; 4] = [
        StaticDataset::Signs,
        StaticDataset::ZoneStreets,
        StaticDataset::Bays,
        StaticDataset::PopulationForecasts,
    ];

    /// Command-line name
    pub fn name(self) -> &'static str {
        match self {
            StaticDataset::Signs => "signs",
            StaticDataset::ZoneStreets => "zone-streets",
            StaticDataset::Bays => "bays",
            StaticDataset::PopulationForecasts => "population-forecasts",
        }
    }

    /// Human-readable label for summaries
    pub fn label(self) -> &'static str {
        match self {
            StaticDataset::Signs => "Signs",
            StaticDataset::ZoneStreets => "Zone to street",
            StaticDataset::Bays => "Bays",
            StaticDataset::PopulationForecasts => "Population forecasts",
        }
    }

    /// File name of the published CSV export
    pub fn default_file_name(self) -> &'static str {
        match self {
            StaticDataset::Signs => constants::DATASET_SIGNS_CSV,
            StaticDataset::ZoneStreets => constants::DATASET_ZONE2STREET_CSV,
            StaticDataset::Bays => constants::DATASET_BAYS_CSV,
            StaticDataset::PopulationForecasts => constants::DATASET_POP_FORECAST_CSV,
        }
    }

    /// Sink table receiving this dataset's records
    pub fn table(self) -> &'static str {
        match self {
            StaticDataset::Signs => tables::SIGN_PLATES,
            StaticDataset::ZoneStreets => tables::ZONE_STREET_LINKS,
            StaticDataset::Bays => tables::PARKING_BAYS,
            StaticDataset::PopulationForecasts => tables::POPULATION_FORECASTS,
        }
    }

    /// Columns the header must provide
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            StaticDataset::Signs => &[
                columns::PARKING_ZONE,
                columns::RESTRICTION_DAYS,
                columns::TIME_RESTRICTIONS_START,
                columns::TIME_RESTRICTIONS_FINISH,
                columns::RESTRICTION_DISPLAY,
            ],
            StaticDataset::ZoneStreets => &[
                columns::PARKING_ZONE,
                columns::ON_STREET,
                columns::STREET_FROM,
                columns::STREET_TO,
                columns::SEGMENT_ID,
            ],
            StaticDataset::Bays => &[
                columns::ROAD_SEGMENT_ID,
                columns::KERBSIDE_ID,
                columns::ROAD_SEGMENT_DESCRIPTION,
                columns::LATITUDE,
                columns::LONGITUDE,
                columns::LAST_UPDATED,
            ],
            StaticDataset::PopulationForecasts => &[
                columns::GEOGRAPHY,
                columns::YEAR,
                columns::GENDER,
                columns::AGE,
                columns::VALUE,
            ],
        }
    }
}

impl FromStr for StaticDataset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        StaticDataset::ALL
            .into_iter()
            .find(|dataset| dataset.name() == name)
            .ok_or_else(|| {
                Error::data_validation(format!(
                    "Unknown dataset '{}'. Available datasets: {}",
                    name,
                    constants::STATIC_DATASET_NAMES.join(", ")
                ))
            })
    }
}

impl fmt::Display for StaticDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Normalized Records
// =============================================================================

/// One realtime bay sensor reading
///
/// `(bay_id, last_updated)` is the natural key: dead sensors keep reporting
/// the same stale reading, so the sink deduplicates on that pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    /// Kerbside identifier of the bay, exactly as delivered
    pub bay_id: String,

    /// Parking zone number, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_number: Option<i64>,

    /// When the feed last refreshed this bay
    pub last_updated: DateTime<FixedOffset>,

    /// When the sensor status last changed
    pub status_timestamp: DateTime<FixedOffset>,

    /// Whether a vehicle is present
    pub presented: bool,

    /// Remaining fields of the feed record, passed through untouched
    pub attributes: BTreeMap<String, Value>,
}

/// One sign plate restriction within a parking zone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignPlate {
    pub parking_zone: u32,

    /// Days the restriction applies
    pub days: DayMask,

    pub start_time: NaiveTime,
    pub finish_time: NaiveTime,

    /// Restriction text as shown on the plate (e.g. "2P", "LZ30")
    pub display: String,
}

/// Link between a parking zone and a street segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneStreetLink {
    pub parking_zone: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_street: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_from: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_to: Option<String>,

    pub segment_id: u32,
}

/// On-street parking bay geometry reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkingBay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_segment_id: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kerbside_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub latitude: f64,
    pub longitude: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
}

/// Population forecast for one small area, year, gender and age group
///
/// Blank `geography`, `gender` or `age` cells are kept as empty text so the
/// row still has a complete key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationForecast {
    pub geography: String,
    pub year: i32,
    pub gender: String,
    pub age: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Any record ready to hand to a record sink
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedRecord {
    SensorReading(SensorReading),
    SignPlate(SignPlate),
    ZoneStreetLink(ZoneStreetLink),
    ParkingBay(ParkingBay),
    PopulationForecast(PopulationForecast),
}

impl NormalizedRecord {
    /// Sink table this record belongs to
    pub fn table(&self) -> &'static str {
        match self {
            NormalizedRecord::SensorReading(_) => tables::SENSOR_READINGS,
            NormalizedRecord::SignPlate(_) => tables::SIGN_PLATES,
            NormalizedRecord::ZoneStreetLink(_) => tables::ZONE_STREET_LINKS,
            NormalizedRecord::ParkingBay(_) => tables::PARKING_BAYS,
            NormalizedRecord::PopulationForecast(_) => tables::POPULATION_FORECASTS,
        }
    }
}

impl From<SensorReading> for NormalizedRecord {
    fn from(record: SensorReading) -> Self {
        NormalizedRecord::SensorReading(record)
    }
}

impl From<SignPlate> for NormalizedRecord {
    fn from(record: SignPlate) -> Self {
        NormalizedRecord::SignPlate(record)
    }
}

impl From<ZoneStreetLink> for NormalizedRecord {
    fn from(record: ZoneStreetLink) -> Self {
        NormalizedRecord::ZoneStreetLink(record)
    }
}

impl From<ParkingBay> for NormalizedRecord {
    fn from(record: ParkingBay) -> Self {
        NormalizedRecord::ParkingBay(record)
    }
}

impl From<PopulationForecast> for NormalizedRecord {
    fn from(record: PopulationForecast) -> Self {
        NormalizedRecord::PopulationForecast(record)
    }
}
