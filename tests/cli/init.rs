//! Tests for `firstboot init`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_init_writes_template() {
    let t = Test::new();

    t.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let config = std::fs::read_to_string(t.config_path()).unwrap();
    assert!(config.contains("[[parameters]]"));
    assert!(config.contains("discord-bot/secrets"));
    assert!(config.contains("TOPGG_BOT_ID"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let t = Test::standard();
    let before = std::fs::read_to_string(t.config_path()).unwrap();

    t.cmd()
        .arg("init")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));

    assert_eq!(std::fs::read_to_string(t.config_path()).unwrap(), before);
}

#[test]
fn test_init_force_overwrites() {
    let t = Test::standard();

    t.cmd().args(["init", "--force"]).assert().success();

    let config = std::fs::read_to_string(t.config_path()).unwrap();
    assert!(config.contains("discord-bot"));
}

#[test]
fn test_init_template_passes_check() {
    let t = Test::new();

    t.cmd().arg("init").assert().success();
    t.cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration is valid"));
}
