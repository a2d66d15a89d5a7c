//! Tests for `firstboot check`.

use crate::support::*;

#[test]
fn test_check_valid_config() {
    let t = Test::standard();

    let output = t.check();
    assert_success(&output);
    assert_stdout_contains(&output, "configuration is valid");
    assert_stdout_contains(
        &output,
        "BOT_TOKEN  secret discord-bot/secrets#bot_token (required, secret)",
    );
    assert_stdout_contains(
        &output,
        "ENV  parameter /discord/env (optional, default 'PROD')",
    );
    assert_stdout_contains(&output, "AWS_REGION");
}

#[test]
fn test_check_has_no_side_effects() {
    let t = Test::standard();

    assert_success(&t.check());
    assert!(!t.env_file().exists());
    assert!(!t.path("units").exists());
    assert!(!t.path("state").exists());
}

#[test]
fn test_check_missing_config() {
    let t = Test::new();

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "config file not found");
    assert_stderr_contains(&output, "firstboot init");
}

#[test]
fn test_check_rejects_parameter_without_source() {
    let t = Test::new();
    t.write_config("[[parameters]]\nenv = \"BOT_TOKEN\"\nrequired = true\n");

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid parameter 'BOT_TOKEN'");
}

#[test]
fn test_check_rejects_duplicate_keys() {
    let t = Test::new();
    t.write_config("[[parameters]]\nenv = \"A\"\nvalue = \"1\"\n\n[[parameters]]\nenv = \"A\"\nvalue = \"2\"\n");

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "duplicate environment key: A");
}

#[test]
fn test_config_flag_overrides_env() {
    let t = Test::standard();
    let elsewhere = t.path("other.toml");
    std::fs::copy(t.config_path(), &elsewhere).unwrap();
    std::fs::remove_file(t.config_path()).unwrap();

    let output = t
        .cmd()
        .arg("--config")
        .arg(&elsewhere)
        .arg("check")
        .output()
        .unwrap();
    assert_success(&output);
}
