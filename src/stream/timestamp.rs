use crate::error::{GreenwallError, Result};
use crate::util::parse_day;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use std::fmt;

/// Commits per day that still fit between local noon and local midnight at one
/// second apart. Past this the `+index` seconds would spill into the next day.
pub const MAX_UNITS_PER_DAY: u32 = 12 * 60 * 60;

/// `<epoch seconds> <+hhmm>` as used on author and committer lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub offset: FixedOffset,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.seconds, format_offset(self.offset))
    }
}

pub fn format_offset(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let minutes = secs.abs() / 60;
    format!("{sign}{:02}{:02}", minutes / 60, minutes % 60)
}

/// Parse a git-style `+hhmm`/`-hhmm` offset.
pub fn parse_offset(input: &str) -> Result<FixedOffset> {
    let invalid = || GreenwallError::validation(format!("invalid UTC offset '{input}', expected +hhmm"));
    let bytes = input.as_bytes();
    if bytes.len() != 5 || !bytes[1..].iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(invalid()),
    };
    let hours: i32 = input[1..3].parse().map_err(|_| invalid())?;
    let minutes: i32 = input[3..5].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Maps (day, 0-based index within the day) to an instant at local noon plus
/// `index` seconds in the configured zone.
///
/// Noon keeps the commit on the same calendar day for any viewer whose zone is
/// within twelve hours of the emitted offset; midnight would slip to the previous
/// day for every zone west of it.
#[derive(Debug, Clone, Copy)]
pub struct TimestampSynthesizer {
    offset: FixedOffset,
}

impl TimestampSynthesizer {
    pub fn utc() -> Self {
        Self::with_offset(Utc.fix())
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn synthesize(&self, date: &str, index: u32) -> Result<Timestamp> {
        let day = parse_day(date)?;
        self.at(day, index)
    }

    pub fn at(&self, day: NaiveDate, index: u32) -> Result<Timestamp> {
        if index >= MAX_UNITS_PER_DAY {
            return Err(GreenwallError::validation(format!(
                "commit index {index} on {day} would leave the day"
            )));
        }
        let noon = day
            .and_hms_opt(12, 0, 0)
            .ok_or_else(|| GreenwallError::date_parse(&day.to_string(), "no noon on this day"))?;
        let seconds = noon.and_utc().timestamp() - i64::from(self.offset.local_minus_utc())
            + i64::from(index);
        Ok(Timestamp {
            seconds,
            offset: self.offset,
        })
    }
}

impl Default for TimestampSynthesizer {
    fn default() -> Self {
        Self::utc()
    }
}
