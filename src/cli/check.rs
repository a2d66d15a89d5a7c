//! Check command.
//!
//! Validates the configuration and prints what `run` would do. Touches
//! nothing on the host and makes no network calls.

use std::path::Path;

use crate::cli::output;
use crate::core::config::{Config, StoreBackend};
use crate::error::Result;

/// Validate the configuration and print the plan.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let parameters = config.parameters()?;

    output::section("Plan");
    output::kv("app", &config.app.name);
    output::kv("install dir", config.app.install_dir.display());
    output::kv("repository", &config.source.repository);
    if let Some(branch) = &config.source.branch {
        output::kv("branch", branch);
    }
    output::kv("package manager", &config.runtime.package_manager);
    if !config.runtime.packages.is_empty() {
        output::kv("packages", config.runtime.packages.join(" "));
    }
    if !config.runtime.dependencies.is_empty() {
        output::kv("dependencies", config.runtime.dependencies.join(" "));
    }
    let store = match (&config.store.backend, &config.store.path) {
        (StoreBackend::File, Some(path)) => format!("file ({})", path.display()),
        (StoreBackend::File, None) => "file".to_string(),
        (StoreBackend::Aws, _) => "aws".to_string(),
    };
    output::kv("store", store);
    output::kv(
        "retry",
        format!(
            "{} attempts, {}s apart",
            config.retry.max_attempts, config.retry.backoff_secs
        ),
    );
    output::kv("env file", config.env_file().display());
    output::kv("unit", config.unit_path().display());
    output::kv("user", &config.service.user);

    output::section("Parameters");
    if parameters.is_empty() {
        output::dimmed("no parameters declared");
    }
    for param in &parameters {
        let mut kind = if param.required { "required" } else { "optional" }.to_string();
        if param.source.is_secret() {
            kind.push_str(", secret");
        }
        let default = param
            .default
            .as_deref()
            .map(|d| format!(", default '{}'", d))
            .unwrap_or_default();
        output::list_item(&format!("{}  {} ({}{})", param.env, param.source, kind, default));
    }
    if config.store.export_region {
        output::list_item("AWS_REGION  discovered region");
    }
    println!();

    output::success("configuration is valid");
    Ok(())
}
