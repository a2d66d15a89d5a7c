//! Tests for `firstboot unit`.

use crate::support::*;

#[test]
fn test_unit_renders_service() {
    let t = Test::standard();

    let output = t.unit();
    assert_success(&output);

    let unit = stdout(&output);
    let root = t.dir.path().display().to_string();
    assert!(unit.starts_with("[Unit]\nDescription=Discord Bot Service\n"));
    assert!(unit.contains("User=ec2-user\n"));
    assert!(unit.contains(&format!("WorkingDirectory={}/opt/bot\n", root)));
    assert!(unit.contains("Restart=always\n"));
    assert!(unit.contains("Environment=PYTHONUNBUFFERED=1\n"));
    assert!(unit.contains(&format!("EnvironmentFile={}/opt/bot/.env\n", root)));
    assert!(unit.ends_with("[Install]\nWantedBy=multi-user.target\n"));
}

#[test]
fn test_unit_writes_nothing() {
    let t = Test::standard();

    assert_success(&t.unit());
    assert!(!t.path("units").exists());
}
