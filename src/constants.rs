//! Application constants for parking ingestion
//!
//! This module contains dataset file names, column names, table names and
//! default values used throughout the ingestion pipelines.

// =============================================================================
// Realtime Sensor Feed
// =============================================================================

/// Default endpoint for the on-street parking bay sensor feed
pub const DEFAULT_REALTIME_URL: &str = "https://data.melbourne.vic.gov.au/api/explore/v2.1/catalog/datasets/on-street-parking-bay-sensors/records";

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Status value that marks a bay as occupied
pub const STATUS_PRESENT: &str = "Present";

/// Field names in realtime sensor records
pub mod realtime_fields {
    pub const LOCATION: &str = "location";
    pub const LAST_UPDATED: &str = "lastupdated";
    pub const STATUS_TIMESTAMP: &str = "status_timestamp";
    pub const STATUS_DESCRIPTION: &str = "status_description";
    pub const KERBSIDE_ID: &str = "kerbsideid";
    pub const ZONE_NUMBER: &str = "zone_number";
}

// =============================================================================
// Static Dataset Files
// =============================================================================

/// Sign plates located in each parking zone
pub const DATASET_SIGNS_CSV: &str = "sign-plates-located-in-each-parking-zone.csv";

/// Parking zones linked to street segments
pub const DATASET_ZONE2STREET_CSV: &str = "parking-zones-linked-to-street-segments.csv";

/// On-street parking bays
pub const DATASET_BAYS_CSV: &str = "on-street-parking-bays.csv";

/// City of Melbourne population forecasts by small area
pub const DATASET_POP_FORECAST_CSV: &str =
    "city-of-melbourne-population-forecasts-by-small-area-2020-2040.csv";

/// Static dataset names accepted on the command line
pub const STATIC_DATASET_NAMES: &[&str] =
    &["signs", "zone-streets", "bays", "population-forecasts"];

// =============================================================================
// Column Name Constants
// =============================================================================

/// Column names in the static CSV exports, as published
pub mod columns {
    // Sign plates
    pub const PARKING_ZONE: &str = "ParkingZone";
    pub const RESTRICTION_DAYS: &str = "Restriction_Days";
    pub const TIME_RESTRICTIONS_START: &str = "Time_Restrictions_Start";
    pub const TIME_RESTRICTIONS_FINISH: &str = "Time_Restrictions_Finish";
    pub const RESTRICTION_DISPLAY: &str = "Restriction_Display";

    // Zone to street segments
    pub const ON_STREET: &str = "OnStreet";
    pub const STREET_FROM: &str = "StreetFrom";
    pub const STREET_TO: &str = "StreetTo";
    pub const SEGMENT_ID: &str = "Segment_ID";

    // Parking bays
    pub const ROAD_SEGMENT_ID: &str = "RoadSegmentID";
    pub const KERBSIDE_ID: &str = "KerbsideID";
    pub const ROAD_SEGMENT_DESCRIPTION: &str = "RoadSegmentDescription";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const LAST_UPDATED: &str = "LastUpdated";

    // Population forecasts
    pub const GEOGRAPHY: &str = "geography";
    pub const YEAR: &str = "year";
    pub const GENDER: &str = "gender";
    pub const AGE: &str = "age";
    pub const VALUE: &str = "value";
}

// =============================================================================
// Sink Tables
// =============================================================================

pub mod tables {
    pub const SENSOR_READINGS: &str = "sensor_readings";
    pub const SIGN_PLATES: &str = "sign_plates";
    pub const ZONE_STREET_LINKS: &str = "zone_street_links";
    pub const PARKING_BAYS: &str = "parking_bays";
    pub const POPULATION_FORECASTS: &str = "population_forecasts";
}

/// Default database file name under the data directory
pub const DEFAULT_DATABASE_FILENAME: &str = "parking.sqlite3";

/// Application directory name under the platform data directory
pub const APP_DIR_NAME: &str = "parking-ingest";

// =============================================================================
// Formats
// =============================================================================

/// Time-of-day formats accepted in sign plate restriction windows
pub const TIME_OF_DAY_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Date formats accepted for bay `LastUpdated` values
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Naive timestamp formats accepted when a realtime timestamp has no offset
pub const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Success rate (percent) above which a dataset run is considered healthy
pub const SUCCESS_RATE_THRESHOLD: f64 = 90.0;
