use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Binary command with config/cache isolated to a scratch home directory
fn clipper(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("video-clipper").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_CACHE_HOME", home.join(".cache"))
        .env("XDG_DATA_HOME", home.join(".data"));
    cmd
}

#[test]
fn unsupported_platform_exits_nonzero() {
    let home = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    clipper(home.path())
        .arg("https://vimeo.com/12345")
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported platform"));

    // No partial note is written
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn invalid_model_selector_is_rejected_at_parse_time() {
    let home = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    clipper(home.path())
        .arg("https://youtube.com/watch?v=abc123")
        .arg(output.path())
        .args(["--model", "huge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn missing_arguments_show_usage() {
    let home = TempDir::new().unwrap();

    clipper(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_flags() {
    let home = TempDir::new().unwrap();

    clipper(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--keep-audio"))
        .stdout(predicate::str::contains("--model"));
}
