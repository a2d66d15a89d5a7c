//! Unit command.

use std::path::Path;

use crate::core::config::Config;
use crate::core::host::service;
use crate::error::Result;

/// Print the rendered systemd unit.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    print!("{}", service::render_unit(&config));
    Ok(())
}
