use crate::calendar::{self, Calendar};
use crate::git::GitRepo;
use anyhow::Context;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub enum HeatSource {
    Calendar(PathBuf),
    Repo(Option<PathBuf>),
}

/// Per-day commit counts plus a label naming where they came from.
pub fn fetch_daily_counts(source: &HeatSource) -> anyhow::Result<(String, BTreeMap<NaiveDate, u64>)> {
    match source {
        HeatSource::Calendar(path) => {
            let request = calendar::load_request(path)
                .with_context(|| format!("Failed to read calendar {}", path.display()))?;
            let calendar = Calendar::normalize(&request.contributions).context("Invalid calendar")?;
            let counts = calendar.daily_counts().context("Invalid calendar date")?;
            Ok((path.to_string_lossy().to_string(), counts))
        }
        HeatSource::Repo(path) => {
            let repo = GitRepo::open(path.as_ref()).context("Failed to open git repository")?;
            let counts = repo
                .daily_counts()
                .context("Failed to read commit history")?;
            Ok((repo.path().to_string_lossy().to_string(), counts))
        }
    }
}
