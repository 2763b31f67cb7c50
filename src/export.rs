use crate::git::GitRepo;
use crate::model::ContributionDay;
use anyhow::Context;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub fn exec(repo: Option<PathBuf>, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let repo = GitRepo::open(repo.as_ref()).context("Failed to open git repository")?;
    let daily = repo
        .daily_counts()
        .context("Failed to read commit history")?;

    let export_data = prepare_export_data(&daily);

    if json {
        output_json(&export_data)?;
    } else if ndjson {
        output_ndjson(&export_data)?;
    } else {
        output_summary(&export_data, &repo)?;
    }

    Ok(())
}

/// Calendar entries in the same shape `generate` accepts, oldest first.
pub fn prepare_export_data(daily: &BTreeMap<NaiveDate, u64>) -> Vec<ContributionDay> {
    daily
        .iter()
        .map(|(day, count)| ContributionDay::new(day.format(crate::util::DATE_FORMAT).to_string(), *count as i64))
        .collect()
}

fn output_json(export_data: &[ContributionDay]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(export_data)?);
    Ok(())
}

fn output_ndjson(export_data: &[ContributionDay]) -> anyhow::Result<()> {
    for entry in export_data {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}

fn output_summary(export_data: &[ContributionDay], repo: &GitRepo) -> anyhow::Result<()> {
    use console::style;

    println!("{}", style("Export Summary").bold());
    println!("{}", "─".repeat(50));

    let total_commits: i64 = export_data.iter().map(|e| e.count).sum();
    let busiest = export_data.iter().max_by_key(|e| e.count);

    println!("Repository: {}", style(repo.path().display()).dim());
    println!("Total commits: {}", style(total_commits).cyan());
    println!("Active days: {}", style(export_data.len()).cyan());
    if let Some(day) = busiest {
        println!("Busiest day: {} ({} commits)", style(&day.date).yellow(), day.count);
    }

    if let (Some(first), Some(last)) = (export_data.first(), export_data.last()) {
        println!(
            "Date range: {} to {}",
            style(&first.date).dim(),
            style(&last.date).dim()
        );
    }

    println!("\nUse --json or --ndjson flags to export the raw data.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_rows_are_generate_input() {
        let daily = BTreeMap::from([
            (NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 1),
            (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 2),
        ]);
        let rows = prepare_export_data(&daily);
        assert_eq!(
            rows,
            vec![ContributionDay::new("2024-01-01", 2), ContributionDay::new("2024-01-03", 1)]
        );
        assert!(crate::calendar::Calendar::normalize(&rows).is_ok());
    }
}
