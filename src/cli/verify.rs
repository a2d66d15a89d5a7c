//! Verify command.
//!
//! Queries the service state once. An inactive service is reported but is
//! not an error.

use std::path::Path;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::host::{service, SystemRunner};
use crate::error::Result;

/// Report whether the service is active.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let name = &config.app.name;

    if service::is_active(name, &SystemRunner)? {
        output::success(&format!("{} is active", name));
    } else {
        output::warn(&format!("{} is not active", name));
        output::hint(&format!(
            "check logs with: {}",
            output::cmd(&format!("journalctl -u {}", name))
        ));
    }
    Ok(())
}
