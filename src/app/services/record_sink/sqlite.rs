//! SQLite record sink
//!
//! One table per record kind. Realtime readings are keyed by
//! `(bay_id, last_updated)` and repeated readings are ignored, since a dead
//! sensor keeps reporting the same stale state. Static tables carry natural
//! unique keys and replace on conflict, so re-running a static import updates
//! rows in place.

use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{KNOWN_TABLES, RecordSink, SinkError, validate_table};
use crate::app::models::NormalizedRecord;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sensor_readings (
    bay_id           TEXT    NOT NULL,
    last_updated     TEXT    NOT NULL,
    status_timestamp TEXT    NOT NULL,
    zone_number      INTEGER,
    presented        INTEGER NOT NULL,
    attributes       TEXT    NOT NULL,
    PRIMARY KEY (bay_id, last_updated)
);

CREATE TABLE IF NOT EXISTS sign_plates (
    parking_zone INTEGER NOT NULL,
    days         INTEGER NOT NULL CHECK (days BETWEEN 0 AND 127),
    start_time   TEXT    NOT NULL,
    finish_time  TEXT    NOT NULL,
    display      TEXT    NOT NULL,
    UNIQUE (parking_zone, days, start_time, finish_time, display)
);

CREATE TABLE IF NOT EXISTS zone_street_links (
    parking_zone INTEGER NOT NULL,
    on_street    TEXT,
    street_from  TEXT,
    street_to    TEXT,
    segment_id   INTEGER NOT NULL,
    UNIQUE (parking_zone, segment_id)
);

CREATE TABLE IF NOT EXISTS parking_bays (
    road_segment_id INTEGER,
    kerbside_id     TEXT,
    description     TEXT,
    latitude        REAL NOT NULL,
    longitude       REAL NOT NULL,
    last_updated    TEXT,
    UNIQUE (latitude, longitude)
);

CREATE TABLE IF NOT EXISTS population_forecasts (
    geography TEXT    NOT NULL,
    year      INTEGER NOT NULL,
    gender    TEXT    NOT NULL,
    age       TEXT    NOT NULL,
    value     REAL,
    UNIQUE (geography, year, gender, age)
);
";

/// Record sink backed by a SQLite database
#[derive(Debug)]
pub struct SqliteSink {
    connection: Option<Connection>,
    path: Option<PathBuf>,
}

impl SqliteSink {
    /// Open (or create) the database at `path` and create missing tables
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let connection = Connection::open(path)?;
        if let Err(e) = connection.pragma_update(None, "journal_mode", "WAL") {
            warn!("Failed to enable WAL mode: {}", e);
        }

        info!("Opened SQLite sink at {}", path.display());
        Self::initialize(connection, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, SinkError> {
        Self::initialize(Connection::open_in_memory()?, None)
    }

    fn initialize(connection: Connection, path: Option<PathBuf>) -> Result<Self, SinkError> {
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Some(connection),
            path,
        })
    }

    /// Database file, `None` for in-memory sinks
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Underlying connection, for queries against stored records
    pub fn connection(&self) -> Result<&Connection, SinkError> {
        self.connection.as_ref().ok_or(SinkError::Closed)
    }

    /// Number of rows in `table`
    pub fn row_count(&self, table: &str) -> Result<u64, SinkError> {
        if !KNOWN_TABLES.contains(&table) {
            return Err(SinkError::UnknownTable(table.to_string()));
        }

        let count: i64 = self.connection()?.query_row(
            &format!("SELECT COUNT(*) FROM {}", table),
            [],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }
}

impl RecordSink for SqliteSink {
    fn insert(&mut self, table: &str, record: &NormalizedRecord) -> Result<(), SinkError> {
        validate_table(table, record)?;
        let connection = self.connection()?;

        let changed = match record {
            NormalizedRecord::SensorReading(reading) => connection.execute(
                "INSERT OR IGNORE INTO sensor_readings
                    (bay_id, last_updated, status_timestamp, zone_number, presented, attributes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    reading.bay_id,
                    reading.last_updated.to_rfc3339(),
                    reading.status_timestamp.to_rfc3339(),
                    reading.zone_number,
                    reading.presented,
                    serde_json::to_string(&reading.attributes)?,
                ],
            )?,
            NormalizedRecord::SignPlate(sign) => connection.execute(
                "INSERT OR REPLACE INTO sign_plates
                    (parking_zone, days, start_time, finish_time, display)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    sign.parking_zone,
                    sign.days.bits(),
                    sign.start_time.to_string(),
                    sign.finish_time.to_string(),
                    sign.display,
                ],
            )?,
            NormalizedRecord::ZoneStreetLink(link) => connection.execute(
                "INSERT OR REPLACE INTO zone_street_links
                    (parking_zone, on_street, street_from, street_to, segment_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    link.parking_zone,
                    link.on_street,
                    link.street_from,
                    link.street_to,
                    link.segment_id,
                ],
            )?,
            NormalizedRecord::ParkingBay(bay) => connection.execute(
                "INSERT OR REPLACE INTO parking_bays
                    (road_segment_id, kerbside_id, description, latitude, longitude, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    bay.road_segment_id,
                    bay.kerbside_id,
                    bay.description,
                    bay.latitude,
                    bay.longitude,
                    bay.last_updated.map(|date| date.to_string()),
                ],
            )?,
            NormalizedRecord::PopulationForecast(forecast) => connection.execute(
                "INSERT OR REPLACE INTO population_forecasts
                    (geography, year, gender, age, value)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    forecast.geography,
                    forecast.year,
                    forecast.gender,
                    forecast.age,
                    forecast.value,
                ],
            )?,
        };

        if changed == 0 {
            debug!("{}: duplicate record ignored", table);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        match self.connection.take() {
            Some(connection) => {
                connection.close().map_err(|(_, e)| SinkError::Database(e))?;
                debug!("SQLite sink closed");
                Ok(())
            }
            None => Ok(()),
        }
    }
}
