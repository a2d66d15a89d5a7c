//! Init command - write a starter configuration.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::atomic;
use crate::core::config::Config;
use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Write the commented template to `path`.
pub fn execute(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()).into());
    }

    atomic::write_atomic(
        path,
        Config::template().as_bytes(),
        constants::PUBLIC_FILE_MODE,
    )?;
    info!(path = %path.display(), "config template written");

    output::success(&format!("created {}", output::path(&path.display().to_string())));
    output::hint(&format!(
        "edit it, then run: {}",
        output::cmd(&format!("firstboot check --config {}", path.display()))
    ));
    Ok(())
}
