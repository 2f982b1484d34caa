//! Binary-level tests for argument handling and the check command.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn devreload() -> Command {
    let mut cmd = Command::cargo_bin("devreload").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    devreload()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dev"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_check_schema_prints_json() {
    let output = devreload()
        .args(["check", "--schema"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let schema: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let properties = &schema["properties"];
    assert!(properties.get("debounce_ms").is_some());
    assert!(properties.get("sse_path").is_some());
}

#[test]
fn test_check_passes_for_valid_site() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("wwwroot/assets")).unwrap();
    fs::write(temp.path().join("build.debug.js"), "").unwrap();

    devreload()
        .arg("check")
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("All checks passed"));
}

#[test]
fn test_check_fails_without_web_root() {
    let temp = TempDir::new().unwrap();

    devreload()
        .arg("check")
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("web_root"));
}

#[test]
fn test_check_rejects_invalid_config() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("wwwroot/assets")).unwrap();
    fs::write(temp.path().join("devreload.json"), r#"{ "sse_path": "sse" }"#).unwrap();

    devreload()
        .arg("check")
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("sse_path"));
}

#[test]
fn test_check_env_override() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("wwwroot/assets")).unwrap();

    devreload()
        .arg("check")
        .arg("--cwd")
        .arg(temp.path())
        .env("DEVRELOAD_POLL_INTERVAL_MS", "0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("poll_interval_ms"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    devreload()
        .args(["--verbose", "--quiet", "check"])
        .assert()
        .failure();
}
