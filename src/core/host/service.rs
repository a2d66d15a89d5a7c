//! systemd service supervision.
//!
//! Renders the unit file, registers it, starts the service and checks that
//! it stayed up.

use std::path::PathBuf;

use tracing::{info, warn};

use super::{run_checked, CommandRunner, CommandSpec};
use crate::core::atomic;
use crate::core::config::Config;
use crate::core::constants;
use crate::core::domain::Verification;
use crate::core::retry::Sleeper;
use crate::error::{HostError, Result};

/// Render the systemd unit for the application.
pub fn render_unit(config: &Config) -> String {
    let service = &config.service;
    let description = service
        .description
        .clone()
        .unwrap_or_else(|| format!("{} service", config.app.name));

    let mut unit = String::new();
    unit.push_str("[Unit]\n");
    unit.push_str(&format!("Description={}\n", description));
    unit.push_str(&format!("After={}\n", service.after));
    unit.push('\n');

    unit.push_str("[Service]\n");
    unit.push_str("Type=simple\n");
    unit.push_str(&format!("User={}\n", service.user));
    unit.push_str(&format!("Group={}\n", service.group()));
    unit.push_str(&format!(
        "WorkingDirectory={}\n",
        config.app.install_dir.display()
    ));
    unit.push_str(&format!("ExecStart={}\n", service.exec_start));
    unit.push_str(&format!("Restart={}\n", service.restart));
    for (key, value) in &service.environment {
        unit.push_str(&format!("Environment={}\n", environment_entry(key, value)));
    }
    if service.load_env_file {
        unit.push_str(&format!("EnvironmentFile={}\n", config.env_file().display()));
    }
    unit.push('\n');

    unit.push_str("[Install]\n");
    unit.push_str(&format!("WantedBy={}\n", service.wanted_by));
    unit
}

fn environment_entry(key: &str, value: &str) -> String {
    if value.contains(char::is_whitespace) || value.contains('"') {
        format!("\"{}={}\"", key, value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        format!("{}={}", key, value)
    }
}

/// Write the unit file, hand the install directory to the service user and
/// enable the unit.
///
/// Returns the unit file path.
pub fn register(config: &Config, runner: &dyn CommandRunner) -> Result<PathBuf> {
    let path = config.unit_path();
    let name = &config.app.name;

    atomic::write_atomic(
        &path,
        render_unit(config).as_bytes(),
        constants::PUBLIC_FILE_MODE,
    )
    .map_err(|source| HostError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "unit file written");

    let owner = format!("{}:{}", config.service.user, config.service.group());
    let install_dir = config.app.install_dir.display().to_string();
    run_checked(
        runner,
        &CommandSpec::new("chown").args(["-R", owner.as_str(), install_dir.as_str()]),
    )?;
    let env_file = config.env_file();
    if !env_file.starts_with(&config.app.install_dir) {
        let env_file = env_file.display().to_string();
        run_checked(
            runner,
            &CommandSpec::new("chown").args([owner.as_str(), env_file.as_str()]),
        )?;
    }

    run_checked(runner, &systemctl(&["daemon-reload"]))?;
    run_checked(runner, &systemctl(&["enable", name.as_str()]))?;
    info!(unit = %name, "service registered");

    Ok(path)
}

/// Start the service, or restart it when it is already running.
pub fn start(config: &Config, runner: &dyn CommandRunner) -> Result<()> {
    let name = &config.app.name;
    let action = if is_active(name, runner)? {
        "restart"
    } else {
        "start"
    };

    info!(unit = %name, action, "starting service");
    run_checked(runner, &systemctl(&[action, name.as_str()]))?;
    Ok(())
}

/// Wait the settle interval, then ask systemd whether the unit is active.
///
/// An inactive unit is reported, not treated as an error.
pub fn verify(
    config: &Config,
    runner: &dyn CommandRunner,
    sleeper: &dyn Sleeper,
) -> Result<Verification> {
    let name = &config.app.name;
    sleeper.sleep(config.service.settle());

    if is_active(name, runner)? {
        info!(unit = %name, "service is active");
        Ok(Verification::Verified)
    } else {
        warn!(
            unit = %name,
            "service is not active; check logs with: journalctl -u {}",
            name
        );
        Ok(Verification::Unverified)
    }
}

/// Whether systemd reports the unit active.
pub fn is_active(name: &str, runner: &dyn CommandRunner) -> Result<bool> {
    let output = runner.run(&systemctl(&["is-active", "--quiet", name]))?;
    Ok(output.is_success())
}

fn systemctl(args: &[&str]) -> CommandSpec {
    CommandSpec::new("systemctl").args(args.iter().copied())
}
