use crate::error::{GreenwallError, Result};
use crate::model::{ContributionDay, GenerateRequest};
use crate::stream::MAX_UNITS_PER_DAY;
use crate::util::parse_day;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;

/// A day that survived normalization: positive count, still carrying the raw date string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: String,
    pub count: u32,
}

/// Validated, date-ascending calendar ready for encoding.
///
/// Duplicate dates are not merged here. Equal dates keep their input order and are
/// encoded as separate groups; callers that want one group per date should run
/// [`merge_by_date`] first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    days: Vec<CalendarDay>,
}

impl Calendar {
    pub fn normalize(input: &[ContributionDay]) -> Result<Self> {
        if input.is_empty() {
            return Err(GreenwallError::EmptyInput("no contributions supplied".into()));
        }

        let mut total: u64 = 0;
        for day in input {
            if day.count < 0 {
                return Err(GreenwallError::validation(format!(
                    "invalid contribution count for {}: {}",
                    day.date, day.count
                )));
            }
            if day.count > i64::from(MAX_UNITS_PER_DAY) {
                return Err(GreenwallError::validation(format!(
                    "contribution count for {} exceeds {} per day: {}",
                    day.date, MAX_UNITS_PER_DAY, day.count
                )));
            }
            total += day.count as u64;
        }
        if total == 0 {
            return Err(GreenwallError::EmptyInput("no commits to generate".into()));
        }

        let mut days: Vec<CalendarDay> = input
            .iter()
            .filter(|d| d.count > 0)
            .map(|d| CalendarDay {
                date: d.date.clone(),
                count: d.count as u32,
            })
            .collect();
        // sort_by is stable: duplicate dates stay in input order
        days.sort_by(|a, b| a.date.cmp(&b.date));

        Ok(Self { days })
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn total_units(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.count)).sum()
    }

    pub fn first_date(&self) -> &str {
        self.days.first().map(|d| d.date.as_str()).unwrap_or_default()
    }

    pub fn last_date(&self) -> &str {
        self.days.last().map(|d| d.date.as_str()).unwrap_or_default()
    }

    /// Units per parsed date, summing duplicate entries.
    pub fn daily_counts(&self) -> Result<BTreeMap<NaiveDate, u64>> {
        let mut counts = BTreeMap::new();
        for day in &self.days {
            *counts.entry(parse_day(&day.date)?).or_insert(0) += u64::from(day.count);
        }
        Ok(counts)
    }
}

/// Sum counts of entries sharing a date. Output is ordered by date.
///
/// Every entry is checked first, so a negative count is rejected rather than
/// absorbed into another entry for the same date.
pub fn merge_by_date(input: &[ContributionDay]) -> Result<Vec<ContributionDay>> {
    let mut merged: BTreeMap<&str, i64> = BTreeMap::new();
    for day in input {
        if day.count < 0 {
            return Err(GreenwallError::validation(format!(
                "invalid contribution count for {}: {}",
                day.date, day.count
            )));
        }
        let total = merged.entry(day.date.as_str()).or_insert(0);
        *total = total.checked_add(day.count).ok_or_else(|| {
            GreenwallError::validation(format!("contribution count for {} overflows", day.date))
        })?;
    }
    Ok(merged
        .into_iter()
        .map(|(date, count)| ContributionDay::new(date, count))
        .collect())
}

/// Decode a calendar file: either a bare array of days or a full request object.
pub fn parse_request(bytes: &[u8]) -> Result<GenerateRequest> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    // decode the chosen shape directly so field errors are reported as-is
    if value.is_array() {
        Ok(GenerateRequest::from_days(serde_json::from_value(value)?))
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

pub fn load_request(path: &Path) -> Result<GenerateRequest> {
    let bytes = std::fs::read(path)?;
    parse_request(&bytes)
}
