//! Day-range to bitmask encoding

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Separator between the start and end day of a range
const RANGE_SEPARATOR: char = '-';

/// Day of the week in calendar order, Sunday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// All days in calendar order
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Position in the calendar week (Sun = 0 ... Sat = 6)
    pub fn calendar_index(self) -> usize {
        self as usize
    }

    /// Singleton bit for this day (Sun = bit 6 ... Sat = bit 0)
    pub fn bit(self) -> u8 {
        1 << (6 - self.calendar_index())
    }

    /// Three-letter abbreviation as published on sign plates
    pub fn abbreviation(self) -> &'static str {
        match self {
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }
}

impl FromStr for Weekday {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|day| day.abbreviation() == token)
            .ok_or_else(|| Error::invalid_day(token, s))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Subset of the week packed into the low 7 bits of a byte
///
/// Only [`encode_days`] produces a mask, so every value seen downstream came
/// from a validated day specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DayMask(u8);

impl DayMask {
    /// Raw mask value in `0..=127`
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Check whether the mask covers a day
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & day.bit() != 0
    }

    /// Days covered by the mask, in calendar order
    pub fn days(self) -> impl Iterator<Item = Weekday> {
        Weekday::ALL.into_iter().filter(move |day| self.contains(*day))
    }

    /// Number of days covered
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn from_day(day: Weekday) -> Self {
        Self(day.bit())
    }

    fn union(days: &[Weekday]) -> Self {
        Self(days.iter().fold(0, |mask, day| mask | day.bit()))
    }
}

impl fmt::Display for DayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#09b}", self.0)
    }
}

/// Encode a day specification (`"Sat"`, `"Mon-Fri"`, `"Fri-Mon"`) as a [`DayMask`]
///
/// Ranges are inclusive at both ends. When the start day falls after the end
/// day in calendar order the range wraps: it covers the start day through
/// Saturday plus Sunday through the end day.
///
/// # Errors
///
/// Returns [`Error::InvalidDay`] when any token is not one of `Sun`, `Mon`,
/// `Tue`, `Wed`, `Thu`, `Fri`, `Sat`.
pub fn encode_days(spec: &str) -> Result<DayMask> {
    let Some((start, end)) = spec.split_once(RANGE_SEPARATOR) else {
        return Ok(DayMask::from_day(parse_day(spec, spec)?));
    };

    let start = parse_day(start, spec)?.calendar_index();
    let end = parse_day(end, spec)?.calendar_index();

    let mask = if start <= end {
        DayMask::union(&Weekday::ALL[start..=end])
    } else {
        let tail = DayMask::union(&Weekday::ALL[start..]);
        let head = DayMask::union(&Weekday::ALL[..=end]);
        DayMask(tail.0 | head.0)
    };

    Ok(mask)
}

fn parse_day(token: &str, spec: &str) -> Result<Weekday> {
    token
        .parse::<Weekday>()
        .map_err(|_| Error::invalid_day(token.trim(), spec))
}
