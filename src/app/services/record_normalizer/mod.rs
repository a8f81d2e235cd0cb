//! Record normalization for realtime and static parking datasets
//!
//! Each raw record is turned into a typed [`NormalizedRecord`], a skip decision,
//! or a hard error. Normalization is pure: the same input always yields the same
//! outcome, and counting accepted records is left to the caller.
//!
//! ## Architecture
//!
//! - [`column_mapping`] - Header analysis and column lookup by normalized name
//! - [`field_parsers`] - Field extraction and coercion returning skip reasons
//! - [`static_tables`] - Sign plate, zone to street, bay and forecast rows
//! - [`realtime`] - Bay sensor records from the JSON feed
//!
//! ## Outcomes
//!
//! | Input problem                         | Outcome                         |
//! |---------------------------------------|---------------------------------|
//! | Field count differs from header       | `Skipped(FieldCountMismatch)`   |
//! | Empty required field                  | `Skipped(MissingField)`         |
//! | Value not coercible to its column     | `Skipped(InvalidValue)`         |
//! | Unknown day in `Restriction_Days`     | `Err(Error::InvalidDay)`        |
//! | Malformed realtime timestamp          | `Err(Error::DateTimeParsing)`   |
//!
//! [`NormalizedRecord`]: crate::app::models::NormalizedRecord

pub mod column_mapping;
pub mod field_parsers;
pub mod realtime;
pub mod static_tables;

#[cfg(test)]
pub mod tests;

pub use column_mapping::ColumnMapping;
pub use realtime::normalize_sensor_record;
pub use static_tables::{
    check_field_count, normalize_parking_bay, normalize_population_forecast,
    normalize_sign_plate, normalize_static, normalize_zone_street_link,
};
