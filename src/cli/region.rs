//! Region command.

use std::path::Path;

use crate::cli::output;
use crate::core::config::Config;
use crate::error::Result;

/// Print the discovered region on stdout and its origin on stderr.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let region = super::discover_region(&config);

    println!("{}", region.name);
    output::hint(&format!("from {}", region.source));
    Ok(())
}
