use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn greenwall(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("greenwall").unwrap();
    cmd.current_dir(dir)
        .env_remove("GREENWALL_CONFIG")
        .env_remove("GREENWALL_GIT")
        .env_remove("GREENWALL_BASE_DIR")
        .env_remove("GREENWALL_BRANCH")
        .env_remove("GREENWALL_UTC_OFFSET")
        .env_remove("RUST_LOG");
    cmd
}

fn write_calendar(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("calendar.json");
    let mut f = File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path
}

const CALENDAR: &str = r#"[
    {"date": "2024-01-03", "count": 1},
    {"date": "2024-01-01", "count": 2},
    {"date": "2024-01-02", "count": 0}
]"#;

#[test]
fn generate_stream_out_writes_a_valid_stream() {
    let dir = tempdir().unwrap();
    let calendar = write_calendar(dir.path(), CALENDAR);
    let stream = dir.path().join("history.fi");

    let out = greenwall(dir.path())
        .args(["generate", "--name", "octo", "--email", "octo@example.com", "--json"])
        .arg(&calendar)
        .arg("--stream-out")
        .arg(&stream)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["commit_count"], 3);
    assert_eq!(v["branch"], "refs/heads/main");
    assert_eq!(v["first_date"], "2024-01-01");
    assert_eq!(v["last_date"], "2024-01-03");
    assert!(v["repository_path"].is_null());

    let bytes = fs::read(&stream).unwrap();
    let summary = greenwall::stream::check_stream(&bytes).unwrap();
    assert_eq!(summary.commits, 3);
    assert!(bytes.ends_with(b"done\n"));
}

#[test]
fn generate_rejects_negative_counts() {
    let dir = tempdir().unwrap();
    let calendar = write_calendar(dir.path(), r#"[{"date": "2024-01-01", "count": -1}]"#);

    let out = greenwall(dir.path())
        .arg("generate")
        .arg(&calendar)
        .arg("--stream-out")
        .arg(dir.path().join("never.fi"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid contribution count"));
    assert!(!dir.path().join("never.fi").exists());
}

#[test]
fn generate_rejects_all_zero_calendar() {
    let dir = tempdir().unwrap();
    let calendar = write_calendar(dir.path(), r#"[{"date": "2024-01-01", "count": 0}]"#);

    greenwall(dir.path())
        .arg("generate")
        .arg(&calendar)
        .arg("--stream-out")
        .arg(dir.path().join("never.fi"))
        .assert()
        .failure();
}

#[test]
fn heat_json_from_calendar() {
    let dir = tempdir().unwrap();
    let calendar = write_calendar(dir.path(), CALENDAR);

    let out = greenwall(dir.path())
        .args(["heat", "--json", "--calendar"])
        .arg(&calendar)
        .output()
        .unwrap();
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let buckets = v["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["commit_count"], 3);
    assert_eq!(buckets[0]["active_days"], 2);
}

#[test]
fn generate_then_verify_and_export() {
    if !has_git() {
        eprintln!("git not available; skipping");
        return;
    }
    let dir = tempdir().unwrap();
    let calendar = write_calendar(dir.path(), CALENDAR);
    let base = dir.path().join("repos");

    let out = greenwall(dir.path())
        .args(["generate", "--name", "octo", "--email", "octo@example.com", "--repo-name", "wall", "--json"])
        .arg("--base-dir")
        .arg(&base)
        .arg(&calendar)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let repo = Path::new(v["repository_path"].as_str().unwrap()).to_path_buf();
    assert!(repo.starts_with(&base));
    assert!(repo.join("README.md").is_file());
    let log = fs::read_to_string(repo.join("activity.log")).unwrap();
    assert_eq!(log.lines().count(), 3);

    let count = Command::new("git")
        .args(["rev-list", "--count", "HEAD"])
        .current_dir(&repo)
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&count.stdout).trim(), "3");

    greenwall(dir.path())
        .arg("verify")
        .arg("--repo")
        .arg(&repo)
        .arg(&calendar)
        .assert()
        .success();

    let out = greenwall(dir.path())
        .args(["export", "--json", "--repo"])
        .arg(&repo)
        .output()
        .unwrap();
    assert!(out.status.success());
    let days: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        days,
        serde_json::json!([
            {"date": "2024-01-01", "count": 2},
            {"date": "2024-01-03", "count": 1}
        ])
    );
}

#[test]
fn verify_reports_mismatch() {
    if !has_git() {
        eprintln!("git not available; skipping");
        return;
    }
    let dir = tempdir().unwrap();
    let calendar = write_calendar(dir.path(), CALENDAR);
    let base = dir.path().join("repos");

    let out = greenwall(dir.path())
        .args(["generate", "--json", "--base-dir"])
        .arg(&base)
        .arg(&calendar)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let repo = v["repository_path"].as_str().unwrap().to_string();

    let other = dir.path().join("other.json");
    fs::write(&other, r#"[{"date": "2024-01-01", "count": 5}]"#).unwrap();

    let out = greenwall(dir.path())
        .args(["verify", "--json", "--repo", &repo])
        .arg(&other)
        .output()
        .unwrap();
    assert!(!out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["expected_commits"], 5);
    assert_eq!(report["actual_commits"], 3);
    assert_eq!(report["mismatches"].as_array().unwrap().len(), 2);
}

#[test]
fn generate_merge_duplicates_sums_counts() {
    let dir = tempdir().unwrap();
    let calendar = write_calendar(
        dir.path(),
        r#"[{"date": "2024-01-01", "count": 2}, {"date": "2024-01-01", "count": 3}]"#,
    );
    let stream = dir.path().join("history.fi");

    let out = greenwall(dir.path())
        .args(["generate", "--merge-duplicates", "--json"])
        .arg(&calendar)
        .arg("--stream-out")
        .arg(&stream)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["commit_count"], 5);
    let text = fs::read_to_string(&stream).unwrap();
    assert!(text.contains("Contribution on 2024-01-01 (5/5)"));
}

#[test]
fn generate_merge_duplicates_rejects_negative_counts() {
    let dir = tempdir().unwrap();
    let calendar = write_calendar(
        dir.path(),
        r#"[{"date": "2024-01-01", "count": 3}, {"date": "2024-01-01", "count": -1}]"#,
    );
    let stream = dir.path().join("never.fi");

    let out = greenwall(dir.path())
        .args(["generate", "--merge-duplicates"])
        .arg(&calendar)
        .arg("--stream-out")
        .arg(&stream)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid contribution count"));
    assert!(!stream.exists());
}

#[test]
fn generate_merge_duplicates_rejects_overflowing_counts() {
    let dir = tempdir().unwrap();
    let body = format!(
        r#"[{{"date": "2024-01-01", "count": {}}}, {{"date": "2024-01-01", "count": 1}}]"#,
        i64::MAX
    );
    let calendar = write_calendar(dir.path(), &body);

    let out = greenwall(dir.path())
        .args(["generate", "--merge-duplicates"])
        .arg(&calendar)
        .arg("--stream-out")
        .arg(dir.path().join("never.fi"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("overflows"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"));
}
