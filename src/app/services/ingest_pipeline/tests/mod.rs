//! Test utilities for ingestion pipelines

use std::fs;
use std::path::{Path, PathBuf};

mod progress_tests;

pub const SIGNS_CSV: &str = "\
ParkingZone,Restriction_Days,Time_Restrictions_Start,Time_Restrictions_Finish,Restriction_Display
7001,Mon-Fri,07:30:00,18:30:00,2P
7001,Sat-Sun,07:30:00,12:30:00,2P
7002,Mon-Fri,07:30:00
7003,Thu-Mon,00:00:00,23:59:00,LZ30
";

pub const BAYS_CSV: &str = "\
RoadSegmentID,KerbsideID,RoadSegmentDescription,Latitude,Longitude,LastUpdated,Location
22730,5701,Queen Street between Flinders Lane and Collins Street,-37.81695,144.96128,2023-10-04,\"-37.81695, 144.96128\"
20184,,Lonsdale Street between Swanston Street and Russell Street,-37.81073,144.96619,2023-10-04,\"-37.81073, 144.96619\"
";

/// Write `content` as `file_name` inside `dir`
pub fn write_dataset(dir: &Path, file_name: &str, content: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, content).unwrap();
    path
}
