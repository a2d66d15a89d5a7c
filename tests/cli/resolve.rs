//! Tests for `firstboot resolve`.

use crate::support::*;

#[test]
fn test_resolve_writes_env_file_in_order() {
    let t = Test::standard();

    let output = t.resolve_to("out/.env");
    assert_success(&output);
    assert_stdout_contains(&output, "wrote 7 entries");
    assert_eq!(t.read("out/.env"), STANDARD_ENV);
}

#[test]
fn test_resolve_never_prints_values() {
    let t = Test::standard();

    let output = t.resolve_to("out/.env");
    assert_success(&output);
    assert_output_excludes(&output, "=abc");
    assert_output_excludes(&output, "=xyz");
}

#[test]
fn test_resolve_overwrites_previous_file() {
    let t = Test::standard();
    std::fs::create_dir_all(t.path("out")).unwrap();
    std::fs::write(t.path("out/.env"), "STALE=1\nOLD=2\n").unwrap();

    assert_success(&t.resolve_to("out/.env"));
    assert_eq!(t.read("out/.env"), STANDARD_ENV);
}

#[cfg(unix)]
#[test]
fn test_resolve_env_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::standard();
    assert_success(&t.resolve_to("out/.env"));

    let mode = std::fs::metadata(t.path("out/.env"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_missing_required_secret_fails_without_env_file() {
    let t = Test::standard();
    t.write_store("[parameters]\n\"/discord/env\" = \"PROD\"\n");

    let output = t.resolve_to("out/.env");
    assert_failure(&output);
    assert_stderr_contains(
        &output,
        "failed to get discord-bot/secrets#bot_token after 3 attempts",
    );
    assert_stderr_contains(&output, "instance role");
    assert!(!t.path("out/.env").exists());
}

#[test]
fn test_missing_required_field_fails() {
    let t = Test::standard();
    t.write_store("[secrets.\"discord-bot/secrets\"]\nbot_token = \"abc\"\n");

    let output = t.resolve_to("out/.env");
    assert_failure(&output);
    assert_stderr_contains(&output, "has no field 'topgg_token'");
}

#[test]
fn test_optional_parameters_default_when_absent() {
    let t = Test::standard();
    t.write_store(
        "[secrets.\"discord-bot/secrets\"]\nbot_token = \"abc\"\ntopgg_token = \"xyz\"\n",
    );

    let output = t.resolve_to("out/.env");
    assert_success(&output);
    let env = t.read("out/.env");
    assert!(env.contains("GUILD_IDS=\n"));
    assert!(env.contains("ENV=PROD\n"));
}

#[test]
fn test_export_region_disabled() {
    let t = Test::new();
    t.write_store(STANDARD_STORE);
    t.write_config_with(
        STANDARD_PARAMETERS,
        "[store]\nbackend = \"file\"\nregion = \"eu-west-1\"\nexport_region = false\n",
    );

    assert_success(&t.resolve_to("out/.env"));
    assert!(!t.read("out/.env").contains("AWS_REGION"));
}
