//! Test support utilities for firstboot integration tests.
//!
//! Provides an isolated environment with a config file, a file-backed
//! store and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment rooted in a temporary directory.
///
/// Every path the config names (install dir, state dir, unit dir, store)
/// lives under `dir`, so tests can run in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    /// Create an empty environment with no config.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Environment with the standard config and store.
    pub fn standard() -> Self {
        let t = Self::new();
        t.write_store(STANDARD_STORE);
        t.write_config(STANDARD_PARAMETERS);
        t
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn config_path(&self) -> PathBuf {
        self.path("firstboot.toml")
    }

    pub fn store_path(&self) -> PathBuf {
        self.path("store.toml")
    }

    pub fn env_file(&self) -> PathBuf {
        self.path("opt/bot/.env")
    }

    /// Write a config using the file store with the given `[[parameters]]`
    /// and any extra sections appended.
    pub fn write_config(&self, parameters: &str) {
        self.write_config_with(parameters, "[store]\nbackend = \"file\"\nregion = \"eu-west-1\"\n");
    }

    /// Write a config with a custom `[store]` section.
    pub fn write_config_with(&self, parameters: &str, store_section: &str) {
        let root = self.dir.path().display();
        let store_path = self.store_path();
        let store_section = if store_section.contains("backend = \"file\"") {
            format!("{}path = \"{}\"\n", store_section, store_path.display())
        } else {
            store_section.to_string()
        };

        let config = format!(
            r#"[app]
name = "bot"
install_dir = "{root}/opt/bot"
state_dir = "{root}/state"

[runtime]
package_manager = "none"
update = false

[source]
repository = "https://example.com/bot.git"

{store_section}
[metadata]
endpoint = "{endpoint}"
timeout_secs = 1
fallback_region = "us-east-1"

[retry]
max_attempts = 3
backoff_secs = 0

[service]
description = "Discord Bot Service"
user = "ec2-user"
exec_start = "/usr/bin/python3 {root}/opt/bot/main.py"
unit_dir = "{root}/units"

[service.environment]
PYTHONUNBUFFERED = "1"

{parameters}"#,
            root = root,
            store_section = store_section,
            endpoint = CLOSED_METADATA_ENDPOINT,
            parameters = parameters,
        );
        fs::write(self.config_path(), config).expect("failed to write config");
    }

    /// Write the file store document.
    pub fn write_store(&self, contents: &str) {
        fs::write(self.store_path(), contents).expect("failed to write store");
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("failed to read file")
    }
}
