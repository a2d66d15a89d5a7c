//! Resolve command.
//!
//! Runs only the configuration step: reads the store and writes the env
//! file. Values are never printed.

use std::path::Path;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::host::{run_checked, CommandSpec, SystemRunner};
use crate::core::resolve::{resolve_environment, Origin};
use crate::core::retry::ThreadSleeper;
use crate::core::store;
use crate::error::Result;

/// Resolve configuration and write the env file.
pub fn execute(config_path: &Path, target: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let region = super::discover_region(&config);
    let store = store::open(&config.store, &region.name)?;

    let resolved = resolve_environment(&config, store.as_ref(), &ThreadSleeper, &region.name)?;

    let env_file = target
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.env_file());
    resolved.env.save(&env_file)?;

    // The configured env file belongs to the service user.
    if target.is_none() && whoami::username() == "root" {
        let owner = format!("{}:{}", config.service.user, config.service.group());
        let path = env_file.display().to_string();
        run_checked(
            &SystemRunner,
            &CommandSpec::new("chown").args([owner.as_str(), path.as_str()]),
        )?;
    }

    output::section("Parameters");
    for entry in &resolved.report {
        let detail = match entry.origin {
            Origin::Store => format!(
                "{} ({} attempt{})",
                entry.name,
                entry.attempts,
                plural(entry.attempts)
            ),
            Origin::Fallback => format!("{} unavailable, default used", entry.name),
            Origin::Literal => "literal".to_string(),
            Origin::Region => format!("{} ({})", region.name, region.source),
        };
        output::list_item(&format!("{}  {}", entry.env, detail));
    }
    println!();

    output::success(&format!(
        "wrote {} entries to {}",
        resolved.env.len(),
        output::path(&env_file.display().to_string())
    ));
    output::dimmed(&format!("sha256 {}", resolved.env.fingerprint()));
    Ok(())
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
