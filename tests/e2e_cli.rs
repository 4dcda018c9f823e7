//! CLI end-to-end tests
//!
//! Tests for the seekback command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the seekback binary
#[allow(deprecated)]
fn seekback_cmd() -> Command {
    let mut cmd = Command::cargo_bin("seekback").unwrap();
    cmd.env_remove("SEEKBACK_SAMPLES_PATH")
        .env_remove("SEEKBACK_SERVER_SAMPLES_PATH")
        .env_remove("SEEKBACK_DB_PATH")
        .env_remove("RUST_LOG");
    cmd
}

/// A temp dir with `samples/`, and a config pointing at it. ffprobe is
/// pointed at a path that doesn't exist so durations stay unknown.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let samples = dir.path().join("samples");
    fs::create_dir(&samples).unwrap();

    let config = dir.path().join("seekback.toml");
    fs::write(
        &config,
        format!(
            r#"
[storage]
samples_path = "{}"
db_path = "{}"

[tools]
ffprobe_path = "/nonexistent/ffprobe"
"#,
            samples.display(),
            dir.path().join("db.sqlite3").display()
        ),
    )
    .unwrap();

    (dir, config)
}

fn write_sample(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join("samples").join(name), contents).unwrap();
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = seekback_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = seekback_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("seekback"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = seekback_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_tools_command() {
    let (_dir, config) = workspace();
    let mut cmd = seekback_cmd();
    cmd.arg("--config")
        .arg(&config)
        .arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffprobe"));
}

#[test]
fn test_cli_validate_config() {
    let (_dir, config) = workspace();
    let mut cmd = seekback_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("aiff, mp3"));
}

#[test]
fn test_cli_validate_rejects_bad_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[storage]\ntranscript_ext = \"mp3\"\n").unwrap();

    let mut cmd = seekback_cmd();
    cmd.arg("validate").arg(&config).assert().failure();
}

#[test]
fn test_cli_sync_and_list() {
    let (dir, config) = workspace();
    write_sample(dir.path(), "2024-03-01T10:00:00+09:00.mp3", "");
    write_sample(dir.path(), "2024-03-01T10:00:00+09:00.txt", "design review");

    let mut cmd = seekback_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["sync", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"inserted\": 1"));

    let mut cmd = seekback_cmd();
    cmd.arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-01T10:00:00+09:00"))
        .stdout(predicate::str::contains("design review"))
        .stdout(predicate::str::contains("unknown"));
}

#[test]
fn test_cli_search() {
    let (dir, config) = workspace();
    write_sample(dir.path(), "2024-03-01T10:00:00+09:00.mp3", "");
    write_sample(
        dir.path(),
        "2024-03-01T10:00:00+09:00.vtt",
        "WEBVTT\n\nthe migration plan",
    );

    seekback_cmd()
        .arg("--config")
        .arg(&config)
        .arg("sync")
        .assert()
        .success();

    seekback_cmd()
        .arg("--config")
        .arg(&config)
        .args(["search", "migration"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**migration**"));

    seekback_cmd()
        .arg("--config")
        .arg(&config)
        .args([
            "search",
            "--contained",
            "2024-02-01T00:00:00Z",
            "2024-02-02T00:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches."));
}

#[test]
fn test_cli_search_rejects_bad_time() {
    let (_dir, config) = workspace();
    seekback_cmd()
        .arg("--config")
        .arg(&config)
        .args(["search", "--start-after", "last tuesday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognised timestamp"));
}

#[test]
fn test_cli_set_summary_and_show() {
    let (dir, config) = workspace();
    write_sample(dir.path(), "2024-03-01T10:00:00+09:00.mp3", "");

    seekback_cmd()
        .arg("--config")
        .arg(&config)
        .arg("sync")
        .assert()
        .success();

    seekback_cmd()
        .arg("--config")
        .arg(&config)
        .args(["set-summary", "2024-03-01T10:00:00+09:00", "weekly sync"])
        .assert()
        .success();

    seekback_cmd()
        .arg("--config")
        .arg(&config)
        .args(["show", "2024-03-01T10:00:00+09:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("weekly sync"))
        .stdout(predicate::str::contains("2024-03-01T10:00:00+09:00.mp3"));
}

#[test]
fn test_cli_set_summary_unknown_sample() {
    let (_dir, config) = workspace();
    seekback_cmd()
        .arg("--config")
        .arg(&config)
        .args(["set-summary", "nope", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_set_transcript_writes_sidecar() {
    let (dir, config) = workspace();
    seekback_cmd()
        .arg("--config")
        .arg(&config)
        .args(["set-transcript", "2024-03-01T10:00:00+09:00", "WEBVTT"])
        .assert()
        .success();

    let written = fs::read_to_string(
        dir.path()
            .join("samples")
            .join("2024-03-01T10:00:00+09:00.vtt"),
    )
    .unwrap();
    assert_eq!(written, "WEBVTT");
}

#[test]
fn test_cli_probe_nonexistent_file() {
    let mut cmd = seekback_cmd();
    cmd.arg("probe")
        .arg("/nonexistent/file.mp3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
