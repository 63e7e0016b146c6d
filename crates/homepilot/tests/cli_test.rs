//! Integration tests for the `homepilot` CLI binary.
//!
//! Argument parsing, help output, completions, config handling and error
//! exits. None of these reach a live hub.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `homepilot` binary with env isolation.
///
/// Clears `HOMEPILOT_*` variables and points config directories at
/// `home` so tests never touch the user's real configuration.
fn homepilot_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("homepilot");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("HOMEPILOT_URL")
        .env_remove("HOMEPILOT_TIMEOUT")
        .env_remove("HOMEPILOT_INVERTED")
        .env_remove("HOMEPILOT_PRUNE_MISSING")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = homepilot_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    homepilot_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Homepilot")
                .and(predicate::str::contains("discover"))
                .and(predicate::str::contains("set")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    homepilot_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("homepilot"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    homepilot_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_get_rejects_unknown_characteristic() {
    let home = tempfile::tempdir().unwrap();
    homepilot_cmd(home.path())
        .args(["get", "1", "brightness"])
        .assert()
        .code(2);
}

#[test]
fn test_discover_without_url_fails_with_usage_code() {
    let home = tempfile::tempdir().unwrap();
    homepilot_cmd(home.path())
        .arg("discover")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No hub URL configured"));
}

#[test]
fn test_unreachable_hub_exits_with_connection_code() {
    let home = tempfile::tempdir().unwrap();
    homepilot_cmd(home.path())
        .args(["--url", "http://127.0.0.1:9", "--timeout", "2", "discover"])
        .assert()
        .code(7);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    let home = tempfile::tempdir().unwrap();
    homepilot_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();
    homepilot_cmd(home.path())
        .args(["--url", "http://192.168.1.20", "--inverted", "config", "init"])
        .assert()
        .success();

    homepilot_cmd(home.path())
        .args(["config", "show", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""url":"http://192.168.1.20""#)
                .and(predicate::str::contains(r#""inverted":true"#)),
        );

    // A second init without --force refuses to overwrite.
    homepilot_cmd(home.path())
        .args(["--url", "http://192.168.1.21", "config", "init"])
        .assert()
        .code(6);
}

#[test]
fn test_config_init_requires_url() {
    let home = tempfile::tempdir().unwrap();
    homepilot_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .code(2);
}

#[test]
fn test_config_show_merges_env_over_file() {
    let home = tempfile::tempdir().unwrap();
    homepilot_cmd(home.path())
        .args(["--url", "http://192.168.1.20", "config", "init"])
        .assert()
        .success();

    homepilot_cmd(home.path())
        .env("HOMEPILOT_TIMEOUT", "5")
        .env("HOMEPILOT_INVERTED", "true")
        .args(["config", "show", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""url":"http://192.168.1.20""#)
                .and(predicate::str::contains(r#""timeout":5"#))
                .and(predicate::str::contains(r#""inverted":true"#)),
        );
}
