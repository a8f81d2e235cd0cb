//! Test utilities for source readers

use std::io::Write;
use tempfile::NamedTempFile;

mod http_source_tests;

/// Write `content` to a temporary `.csv` file
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

/// Excerpt of the on-street parking bays export
pub fn create_test_bays_csv() -> String {
    r#"RoadSegmentID,KerbsideID,RoadSegmentDescription,Latitude,Longitude,LastUpdated,Location
22730,5701,Queen Street between Flinders Lane and Collins Street,-37.81695,144.96128,2023-10-04,"-37.81695, 144.96128"
20184,,Lonsdale Street between Swanston Street and Russell Street,-37.81073,144.96619,2023-10-04,"-37.81073, 144.96619"
"#
    .to_string()
}
