//! Restriction day encoding for sign plate records
//!
//! Sign plates state the days a restriction applies as a single day (`Sun`)
//! or a range (`Mon-Fri`, `Sat-Sun`). Relational stores have no set type, so
//! the days are packed into a 7-bit integer with a fixed bit per day:
//!
//! | Day | Bit | Value       |
//! |-----|-----|-------------|
//! | Sun | 6   | `0b1000000` |
//! | Mon | 5   | `0b0100000` |
//! | Tue | 4   | `0b0010000` |
//! | Wed | 3   | `0b0001000` |
//! | Thu | 2   | `0b0000100` |
//! | Fri | 1   | `0b0000010` |
//! | Sat | 0   | `0b0000001` |
//!
//! Ranges are walked in calendar order (Sun first, Sat last). A range whose
//! start comes after its end wraps across the week boundary, so `Fri-Mon`
//! covers Fri, Sat, Sun and Mon.
//!
//! ```rust
//! use parking_ingest::app::services::day_encoder::encode_days;
//!
//! # fn example() -> parking_ingest::Result<()> {
//! assert_eq!(encode_days("Mon-Fri")?.bits(), 0b0111110);
//! assert_eq!(encode_days("Sat-Sun")?.bits(), 0b1000001);
//! # Ok(())
//! # }
//! ```

pub mod encoder;

#[cfg(test)]
pub mod tests;

pub use encoder::{DayMask, Weekday, encode_days};
