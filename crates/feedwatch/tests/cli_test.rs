//! Integration tests for the `feedwatch` CLI binary.
//!
//! Every data command runs against the seeded mock backend with latency
//! disabled, so output is deterministic and fast.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `feedwatch` binary with env isolation.
///
/// Clears `FEEDWATCH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn feedwatch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("feedwatch");
    cmd.env("HOME", "/tmp/feedwatch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/feedwatch-cli-test-nonexistent")
        .env_remove("FEEDWATCH_OUTPUT")
        .env_remove("FEEDWATCH_SEED")
        .env_remove("FEEDWATCH_DASHBOARD__ALERT_THRESHOLD")
        .env_remove("FEEDWATCH_MOCK__DATASET")
        .env_remove("RUST_LOG");
    cmd
}

/// Seeded, latency-free invocation emitting compact JSON.
fn data_cmd(args: &[&str]) -> assert_cmd::Command {
    let mut cmd = feedwatch_cmd();
    cmd.args(["--no-latency", "--seed", "7", "-o", "json-compact"])
        .args(args);
    cmd
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = feedwatch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    feedwatch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("feeds")
            .and(predicate::str::contains("alerts"))
            .and(predicate::str::contains("clients"))
            .and(predicate::str::contains("performance")),
    );
}

#[test]
fn test_completions_bash() {
    feedwatch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("feedwatch"));
}

#[test]
fn test_invalid_output_format() {
    let output = feedwatch_cmd()
        .args(["-o", "xml", "stats"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Feeds ───────────────────────────────────────────────────────────

#[test]
fn test_feeds_pages() {
    let sizes: Vec<usize> = ["1", "2", "3", "4"]
        .iter()
        .map(|page| {
            let output = data_cmd(&["feeds", "list", "--page", page]).output().unwrap();
            assert!(output.status.success());
            json_stdout(&output).as_array().unwrap().len()
        })
        .collect();
    assert_eq!(sizes, [10, 10, 5, 0]);
}

#[test]
fn test_feeds_all_and_search() {
    let output = data_cmd(&["feeds", "list", "--all"]).output().unwrap();
    assert_eq!(json_stdout(&output).as_array().unwrap().len(), 25);

    let output = data_cmd(&["feeds", "list", "--all", "--search", "client a"])
        .output()
        .unwrap();
    let feeds = json_stdout(&output);
    for feed in feeds.as_array().unwrap() {
        let client = feed["client"].as_str().unwrap();
        assert!(client.to_lowercase().contains("client a"), "{client}");
    }
}

#[test]
fn test_feeds_get_and_not_found() {
    let output = data_cmd(&["feeds", "get", "feed-007"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["id"], "feed-007");

    let output = data_cmd(&["feeds", "get", "feed-999"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("feeds list"));
}

#[test]
fn test_feeds_summary_counts_everything() {
    let output = data_cmd(&["feeds", "summary"]).output().unwrap();
    assert_eq!(json_stdout(&output)["total"], 25);
}

// ── Alerts ──────────────────────────────────────────────────────────

#[test]
fn test_alerts_list_newest_first() {
    let output = data_cmd(&["alerts", "list"]).output().unwrap();
    let alerts = json_stdout(&output);
    let stamps: Vec<chrono::DateTime<chrono::FixedOffset>> = alerts
        .as_array()
        .unwrap()
        .iter()
        .map(|a| chrono::DateTime::parse_from_rfc3339(a["timestamp"].as_str().unwrap()).unwrap())
        .collect();
    assert_eq!(stamps.len(), 15);
    let mut sorted = stamps.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(stamps, sorted);
}

#[test]
fn test_alerts_limit_and_unacknowledged() {
    let output = data_cmd(&["alerts", "list", "-u", "--limit", "4"])
        .output()
        .unwrap();
    let alerts = json_stdout(&output);
    let alerts = alerts.as_array().unwrap();
    assert!(alerts.len() <= 4);
    assert!(alerts.iter().all(|a| a["isAcknowledged"] == false));
}

#[test]
fn test_alerts_ack_returns_updated_alert() {
    let output = data_cmd(&["alerts", "ack", "alert-007"]).output().unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let alert = json_stdout(&output);
    assert_eq!(alert["id"], "alert-007");
    assert_eq!(alert["isAcknowledged"], true);
}

#[test]
fn test_alerts_threshold_from_env() {
    let output = data_cmd(&["alerts", "list"])
        .env("FEEDWATCH_DASHBOARD__ALERT_THRESHOLD", "critical")
        .output()
        .unwrap();
    let alerts = json_stdout(&output);
    assert!(
        alerts
            .as_array()
            .unwrap()
            .iter()
            .all(|a| a["severity"] == "critical")
    );
}

// ── Clients, stats, performance ─────────────────────────────────────

#[test]
fn test_clients_list() {
    let output = data_cmd(&["clients", "list"]).output().unwrap();
    assert_eq!(json_stdout(&output).as_array().unwrap().len(), 5);
}

#[test]
fn test_stats_and_performance() {
    let output = data_cmd(&["stats"]).output().unwrap();
    assert_eq!(json_stdout(&output)["totalFeeds"], 25);

    let output = data_cmd(&["performance"]).output().unwrap();
    assert_eq!(json_stdout(&output).as_array().unwrap().len(), 7);
}

#[test]
fn test_plain_output_lists_ids() {
    feedwatch_cmd()
        .args(["--no-latency", "--seed", "7", "-o", "plain", "clients", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("client-1").and(predicate::str::contains("client-5")));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    feedwatch_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults() {
    feedwatch_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("refresh_interval = 30"));
}

#[test]
fn test_config_set_and_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().to_str().unwrap();

    feedwatch_cmd()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .args(["config", "set", "dashboard.refresh_interval", "60"])
        .assert()
        .success();
    let written = std::fs::read_to_string(dir.path().join("feedwatch/config.toml")).unwrap();
    assert!(written.contains("refresh_interval = 60"), "{written}");

    let output = feedwatch_cmd()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .args(["config", "set", "advanced.timeout", "5"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_config_init_without_tty_requires_yes() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().to_str().unwrap();

    feedwatch_cmd()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .args(["config", "init"])
        .assert()
        .success();

    let output = feedwatch_cmd()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .args(["config", "init"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    feedwatch_cmd()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .args(["config", "init", "--yes"])
        .assert()
        .success();
}
