//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a firstboot command pointed at this environment's config.
    ///
    /// `AWS_REGION` is cleared so region discovery is deterministic, and
    /// colors are off so output can be matched.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("firstboot").expect("failed to find firstboot binary");
        cmd.env("FIRSTBOOT_CONFIG", self.config_path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("AWS_REGION");
        cmd.env_remove("FIRSTBOOT_LOG");
        cmd.env_remove("FIRSTBOOT_LOG_FORMAT");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `firstboot check`.
    pub fn check(&self) -> Output {
        self.cmd()
            .arg("check")
            .output()
            .expect("failed to run firstboot check")
    }

    /// Shortcut for `firstboot resolve --output <path>`.
    pub fn resolve_to(&self, relative: &str) -> Output {
        self.cmd()
            .args(["resolve", "--output"])
            .arg(self.path(relative))
            .output()
            .expect("failed to run firstboot resolve")
    }

    /// Shortcut for `firstboot region`.
    pub fn region(&self) -> Output {
        self.cmd()
            .arg("region")
            .output()
            .expect("failed to run firstboot region")
    }

    /// Shortcut for `firstboot unit`.
    pub fn unit(&self) -> Output {
        self.cmd()
            .arg("unit")
            .output()
            .expect("failed to run firstboot unit")
    }
}
