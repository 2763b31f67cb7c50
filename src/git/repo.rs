use crate::error::{GreenwallError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count commits reachable from HEAD per day, using each commit's committer
    /// time in the committer's own offset (the day a contribution graph shows).
    pub fn daily_counts(&self) -> Result<BTreeMap<NaiveDate, u64>> {
        let mut head = self.repo.head()?;
        let head_commit = head.peel_to_commit_in_place()?;

        let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: Vec<ObjectId> = vec![head_commit.id];

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Reading history...");

        while let Some(commit_id) = stack.pop() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let time = commit.time()?;
            *counts.entry(local_day(time.seconds, time.offset)?).or_insert(0) += 1;

            stack.extend(commit.parent_ids().map(|id| id.detach()));
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(counts)
    }
}

fn local_day(seconds: i64, offset: i32) -> Result<NaiveDate> {
    let offset = FixedOffset::east_opt(offset).unwrap_or_else(|| Utc.fix());
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.with_timezone(&offset).date_naive())
        .ok_or_else(|| GreenwallError::GitRepo(format!("Invalid timestamp: {seconds}")))
}
