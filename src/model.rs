use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// One calendar cell: how many commits should land on `date` (`YYYY-MM-DD`).
///
/// `count` is signed so that negative input survives decoding and is rejected
/// by [`crate::calendar::Calendar::normalize`] with a proper message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContributionDay {
    pub date: String,
    pub count: i64,
}

impl ContributionDay {
    pub fn new(date: impl Into<String>, count: i64) -> Self {
        Self {
            date: date.into(),
            count,
        }
    }
}

/// Full generation request as accepted on the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    pub contributions: Vec<ContributionDay>,
}

impl GenerateRequest {
    pub fn from_days(contributions: Vec<ContributionDay>) -> Self {
        Self {
            year: None,
            username: None,
            email: None,
            repo_name: None,
            contributions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: Option<String>,
    pub stream_path: Option<String>,
    pub repo_name: String,
    pub branch: String,
    pub commit_count: usize,
    pub first_date: String,
    pub last_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatBucket {
    pub week: String,
    pub commit_count: u64,
    pub active_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub buckets: Vec<HeatBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMismatch {
    pub date: NaiveDate,
    pub expected: u64,
    pub actual: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub version: u32,
    pub repository_path: String,
    pub expected_commits: u64,
    pub actual_commits: u64,
    pub mismatches: Vec<DayMismatch>,
}

impl VerifyReport {
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }
}
