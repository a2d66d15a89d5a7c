//! Run command.
//!
//! Executes the whole bootstrap against the real host.

use std::path::Path;

use tracing::warn;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::domain::Verification;
use crate::core::host::SystemRunner;
use crate::core::pipeline::{Provisioner, RunOptions};
use crate::core::retry::ThreadSleeper;
use crate::core::store;
use crate::error::Result;

/// Run the bootstrap.
pub fn execute(config_path: &Path, options: RunOptions) -> Result<()> {
    let config = Config::load(config_path)?;

    if whoami::username() != "root" {
        warn!("not running as root; package installs and systemctl calls will likely fail");
    }

    let region = super::discover_region(&config);
    let store = store::open(&config.store, &region.name)?;

    let outcome = Provisioner::new(
        &config,
        store.as_ref(),
        &SystemRunner,
        &ThreadSleeper,
        &region.name,
    )
    .with_options(options)
    .run()?;

    output::section("Bootstrap");
    output::kv("app", &config.app.name);
    output::kv("region", format!("{} ({})", region.name, region.source));
    output::kv("env file", output::path(&outcome.env_file.display().to_string()));
    output::kv("entries", outcome.report.len());
    output::kv("sha256", &outcome.fingerprint);
    output::kv("stage", outcome.stage);
    println!();

    match outcome.verification {
        Verification::Verified => {
            output::success(&format!("{} is running", config.app.name));
        }
        Verification::Unverified => {
            output::warn(&format!(
                "{} did not report active after {}s",
                config.app.name, config.service.settle_secs
            ));
            output::hint(&format!(
                "check logs with: {}",
                output::cmd(&format!("journalctl -u {}", config.app.name))
            ));
        }
    }

    Ok(())
}
