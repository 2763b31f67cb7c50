use crate::calendar::{self, Calendar};
use crate::git::GitRepo;
use crate::model::{DayMismatch, VerifyReport, SCHEMA_VERSION};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use console::style;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub fn exec(repo: Option<PathBuf>, calendar_path: PathBuf, json: bool) -> anyhow::Result<()> {
    let request = calendar::load_request(&calendar_path)
        .with_context(|| format!("Failed to read calendar {}", calendar_path.display()))?;
    let expected = Calendar::normalize(&request.contributions)
        .and_then(|c| c.daily_counts())
        .context("Invalid calendar")?;

    let repo = GitRepo::open(repo.as_ref()).context("Failed to open git repository")?;
    let actual = repo
        .daily_counts()
        .context("Failed to read commit history")?;

    let report = compare(&expected, &actual, &repo.path().to_string_lossy());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output_report(&report);
    }

    if !report.is_match() {
        bail!(
            "history does not match calendar on {} day(s)",
            report.mismatches.len()
        );
    }
    Ok(())
}

/// Every date present on either side whose counts differ.
pub fn compare(
    expected: &BTreeMap<NaiveDate, u64>,
    actual: &BTreeMap<NaiveDate, u64>,
    repository_path: &str,
) -> VerifyReport {
    let dates: BTreeSet<&NaiveDate> = expected.keys().chain(actual.keys()).collect();
    let mismatches = dates
        .into_iter()
        .filter_map(|date| {
            let e = expected.get(date).copied().unwrap_or(0);
            let a = actual.get(date).copied().unwrap_or(0);
            (e != a).then_some(DayMismatch {
                date: *date,
                expected: e,
                actual: a,
            })
        })
        .collect();

    VerifyReport {
        version: SCHEMA_VERSION,
        repository_path: repository_path.to_string(),
        expected_commits: expected.values().sum(),
        actual_commits: actual.values().sum(),
        mismatches,
    }
}

fn output_report(report: &VerifyReport) {
    println!("{}", style("Calendar Verification").bold());
    println!("{}", "─".repeat(50));
    println!("Expected commits: {}", style(report.expected_commits).cyan());
    println!("Actual commits: {}", style(report.actual_commits).cyan());

    if report.is_match() {
        println!("{}", style("History matches the calendar").green());
        return;
    }
    for m in &report.mismatches {
        println!(
            "{} expected {:>4}, found {:>4}",
            m.date,
            style(m.expected).green(),
            style(m.actual).red()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn compare_reports_days_missing_on_either_side() {
        let expected = BTreeMap::from([(day("2024-01-01"), 2), (day("2024-01-02"), 1)]);
        let actual = BTreeMap::from([(day("2024-01-01"), 2), (day("2024-01-05"), 3)]);

        let report = compare(&expected, &actual, "/tmp/wall");
        assert!(!report.is_match());
        assert_eq!(report.expected_commits, 3);
        assert_eq!(report.actual_commits, 5);
        assert_eq!(
            report.mismatches,
            vec![
                DayMismatch { date: day("2024-01-02"), expected: 1, actual: 0 },
                DayMismatch { date: day("2024-01-05"), expected: 0, actual: 3 },
            ]
        );
    }

    #[test]
    fn identical_counts_match() {
        let counts = BTreeMap::from([(day("2024-01-01"), 7)]);
        assert!(compare(&counts, &counts, ".").is_match());
    }
}
