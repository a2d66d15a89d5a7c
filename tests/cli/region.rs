//! Tests for `firstboot region`.

use crate::support::*;

#[test]
fn test_configured_region() {
    let t = Test::standard();

    let output = t.region();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "eu-west-1");
    assert_stderr_contains(&output, "from config");
}

#[test]
fn test_environment_region() {
    let t = Test::new();
    t.write_config_with("", "[store]\nbackend = \"file\"\n");
    t.write_store("");

    let output = t.cmd().arg("region").env("AWS_REGION", "ap-southeast-2").output().unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "ap-southeast-2");
    assert_stderr_contains(&output, "from environment");
}

#[test]
fn test_unreachable_metadata_falls_back() {
    let t = Test::new();
    t.write_config_with("", "[store]\nbackend = \"file\"\n");
    t.write_store("");

    let output = t.region();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "us-east-1");
    assert_stderr_contains(&output, "from fallback");
}
