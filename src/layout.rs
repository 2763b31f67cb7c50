use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const STATIC_FILE: &str = "README.md";
pub const ACTIVITY_LOG_FILE: &str = "activity.log";
pub const DEFAULT_REPO_NAME: &str = "contributions";
pub const BASE_DIR_NAME: &str = "green-wall";
pub const MAX_REPO_NAME_LEN: usize = 64;

/// Reduce a label to `[A-Za-z0-9._-]`, collapsing each run of other characters
/// into one `-`, trimming dashes and capping the length.
pub fn sanitize_repo_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.trim().chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    let mut name = out.trim_matches('-').to_string();
    // ASCII only at this point, so byte truncation is safe
    name.truncate(MAX_REPO_NAME_LEN);
    if name.is_empty() {
        DEFAULT_REPO_NAME.to_string()
    } else {
        name
    }
}

pub fn readme_content(repo_name: &str) -> String {
    format!("# {repo_name}\n\nGenerated with greenwall.\n")
}

/// Where a generated repository lives and which files its commits touch.
#[derive(Debug, Clone)]
pub struct RepoLayout {
    base_dir: PathBuf,
    repo_name: String,
}

impl RepoLayout {
    pub fn new(base_dir: impl Into<PathBuf>, label: &str) -> Self {
        Self {
            base_dir: base_dir.into(),
            repo_name: sanitize_repo_name(label),
        }
    }

    pub fn default_base_dir() -> PathBuf {
        std::env::temp_dir().join(BASE_DIR_NAME)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    pub fn static_file(&self) -> &'static str {
        STATIC_FILE
    }

    pub fn log_file(&self) -> &'static str {
        ACTIVITY_LOG_FILE
    }

    pub fn readme(&self) -> String {
        readme_content(&self.repo_name)
    }

    /// Create the base directory and a fresh `<name>-XXXXXX` directory inside it.
    /// The directory is kept; concurrent sessions never share one.
    pub fn create(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.base_dir)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", self.repo_name))
            .tempdir_in(&self.base_dir)?
            .keep();
        debug!(path = %dir.display(), "created repository directory");
        Ok(dir)
    }
}
