//! Tests for error handling and CLI flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    for command in ["run", "resolve", "region", "unit", "verify", "check", "init"] {
        assert_stdout_contains(&output, command);
    }
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("firstboot"));
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_firstboot"));
}

#[test]
fn test_run_without_config_fails() {
    let t = Test::new();

    t.cmd()
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_malformed_config_reports_parse_error() {
    let t = Test::new();
    std::fs::write(t.config_path(), "[app\nname = ").unwrap();

    t.cmd()
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse config"));
}
