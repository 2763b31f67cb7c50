use crate::error::{GreenwallError, Result};
use chrono::{Datelike, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Strict `YYYY-MM-DD`; chrono alone would also take unpadded fields, which
/// break the lexical ordering the calendar relies on.
pub fn parse_day(date: &str) -> Result<NaiveDate> {
    if date.len() != 10 {
        return Err(GreenwallError::date_parse(date, "expected YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e| GreenwallError::date_parse(date, e))
}

pub fn week_key(day: &NaiveDate) -> String {
    let week = day.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}
