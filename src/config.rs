use crate::cli::CommonArgs;
use crate::error::{GreenwallError, Result};
use crate::layout::RepoLayout;
use crate::stream::{parse_offset, DEFAULT_BRANCH};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_USERNAME: &str = "greenwall";
pub const DEFAULT_GIT: &str = "git";
pub const DEFAULT_UTC_OFFSET: &str = "+0000";
pub const LOCAL_CONFIG: &str = "config/greenwall.json";

pub const ENV_CONFIG: &str = "GREENWALL_CONFIG";
pub const ENV_GIT: &str = "GREENWALL_GIT";
pub const ENV_BASE_DIR: &str = "GREENWALL_BASE_DIR";
pub const ENV_BRANCH: &str = "GREENWALL_BRANCH";
pub const ENV_UTC_OFFSET: &str = "GREENWALL_UTC_OFFSET";

/// Author and committer identity written on every commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: &str, email: &str) -> Result<Self> {
        let name = name.trim();
        let email = email.trim();
        for (field, value) in [("name", name), ("email", email)] {
            if value.contains(['<', '>', '\n', '\r']) {
                return Err(GreenwallError::validation(format!(
                    "author {field} may not contain '<', '>' or line breaks: {value:?}"
                )));
            }
        }
        if name.is_empty() {
            return Err(GreenwallError::validation("author name is empty"));
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// First non-blank candidate wins for each field; the email falls back to the
    /// hosting service's noreply address for the chosen name.
    pub fn resolve(names: &[Option<&str>], emails: &[Option<&str>]) -> Result<Self> {
        let name = first_non_blank(names).unwrap_or(DEFAULT_USERNAME);
        let email = match first_non_blank(emails) {
            Some(email) => email.to_string(),
            None => format!("{}@users.noreply.github.com", name.trim()),
        };
        Self::new(name, &email)
    }
}

fn first_non_blank<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.trim().is_empty())
}

/// Repository label before sanitization: explicit name, else `<user>-<year>`, else `<user>`.
pub fn repo_label(names: &[Option<&str>], username: &str, year: Option<i32>) -> String {
    match (first_non_blank(names), year) {
        (Some(name), _) => name.trim().to_string(),
        (None, Some(year)) if year > 0 => format!("{username}-{year}"),
        (None, _) => username.to_string(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default)]
    pub git_path: Option<PathBuf>,
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub utc_offset: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| GreenwallError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| GreenwallError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Effective settings after layering CLI > environment > config file > defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub git: PathBuf,
    pub base_dir: PathBuf,
    pub branch: String,
    pub utc_offset: FixedOffset,
    pub username: Option<String>,
    pub email: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl Settings {
    pub fn load(common: &CommonArgs) -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        let config_path = locate_config(common.config.as_deref(), &env);
        let file = match &config_path {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        let mut settings = Self::layered(common, &env, file)?;
        settings.config_path = config_path;
        debug!(
            git = %settings.git.display(),
            base_dir = %settings.base_dir.display(),
            branch = %settings.branch,
            config = ?settings.config_path,
            "resolved settings"
        );
        Ok(settings)
    }

    pub fn layered(
        common: &CommonArgs,
        env: &dyn Fn(&str) -> Option<String>,
        file: ConfigFile,
    ) -> Result<Self> {
        let git = common
            .git
            .clone()
            .or_else(|| env(ENV_GIT).map(PathBuf::from))
            .or(file.git_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GIT));
        let base_dir = common
            .base_dir
            .clone()
            .or_else(|| env(ENV_BASE_DIR).map(PathBuf::from))
            .or(file.base_dir)
            .unwrap_or_else(RepoLayout::default_base_dir);
        let branch = common
            .branch
            .clone()
            .or_else(|| env(ENV_BRANCH))
            .or(file.branch)
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        let utc_offset = common
            .utc_offset
            .clone()
            .or_else(|| env(ENV_UTC_OFFSET))
            .or(file.utc_offset)
            .unwrap_or_else(|| DEFAULT_UTC_OFFSET.to_string());

        Ok(Self {
            git,
            base_dir,
            branch: normalize_branch(&branch)?,
            utc_offset: parse_offset(utc_offset.trim())?,
            username: file.username,
            email: file.email,
            config_path: None,
        })
    }
}

fn locate_config(explicit: Option<&Path>, env: &dyn Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env(ENV_CONFIG) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(LOCAL_CONFIG);
    local.is_file().then_some(local)
}

/// Accept `main` or `refs/heads/main`; always return the full ref.
pub fn normalize_branch(input: &str) -> Result<String> {
    let input = input.trim();
    let short = input.strip_prefix("refs/heads/").unwrap_or(input);
    let valid = !short.is_empty()
        && !short.starts_with('-')
        && !short.ends_with('/')
        && !short.contains("..")
        && !short
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '~' | '^' | ':' | '?' | '*' | '[' | '\\'));
    if !valid {
        return Err(GreenwallError::validation(format!("invalid branch name '{input}'")));
    }
    Ok(format!("refs/heads/{short}"))
}
