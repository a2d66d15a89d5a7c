//! Runtime and dependency installation.

use std::fmt;

use tracing::{debug, info};

use super::{run_checked, CommandRunner, CommandSpec};
use crate::core::config::RuntimeConfig;
use crate::error::{HostError, Result};

/// A system package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Dnf,
    Yum,
    Apt,
}

impl PackageManager {
    /// Detection order.
    pub const ALL: [PackageManager; 3] = [Self::Dnf, Self::Yum, Self::Apt];

    pub fn program(&self) -> &'static str {
        match self {
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Apt => "apt-get",
        }
    }

    /// Commands that refresh and upgrade installed packages.
    pub fn update_commands(&self) -> Vec<CommandSpec> {
        match self {
            Self::Dnf | Self::Yum => {
                vec![CommandSpec::new(self.program()).args(["update", "-y"])]
            }
            Self::Apt => vec![
                CommandSpec::new("apt-get")
                    .arg("update")
                    .env("DEBIAN_FRONTEND", "noninteractive"),
                CommandSpec::new("apt-get")
                    .args(["upgrade", "-y"])
                    .env("DEBIAN_FRONTEND", "noninteractive"),
            ],
        }
    }

    /// Command that installs `packages`.
    pub fn install_command(&self, packages: &[String]) -> CommandSpec {
        let spec = CommandSpec::new(self.program())
            .args(["install", "-y"])
            .args(packages.iter().cloned());
        match self {
            Self::Apt => spec.env("DEBIAN_FRONTEND", "noninteractive"),
            _ => spec,
        }
    }

    /// Pick the manager named in config, or the first one found on `PATH`.
    ///
    /// Returns `Ok(None)` for `"none"`.
    ///
    /// # Errors
    ///
    /// Returns `HostError::NoPackageManager` when `"auto"` finds nothing.
    pub fn select(name: &str, runner: &dyn CommandRunner) -> Result<Option<Self>> {
        match name {
            "none" => Ok(None),
            "dnf" => Ok(Some(Self::Dnf)),
            "yum" => Ok(Some(Self::Yum)),
            "apt" | "apt-get" => Ok(Some(Self::Apt)),
            _ => Self::ALL
                .into_iter()
                .find(|pm| runner.exists(pm.program()))
                .map(Some)
                .ok_or_else(|| HostError::NoPackageManager.into()),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Install the runtime packages and the application's dependency set.
///
/// Every step is fatal on failure; nothing is retried.
pub fn install_dependencies(runtime: &RuntimeConfig, runner: &dyn CommandRunner) -> Result<()> {
    let needs_packages = runtime.update || !runtime.packages.is_empty();

    if needs_packages {
        match PackageManager::select(&runtime.package_manager, runner)? {
            Some(pm) => {
                debug!(package_manager = %pm, "using package manager");
                if runtime.update {
                    info!(package_manager = %pm, "updating system packages");
                    for spec in pm.update_commands() {
                        run_checked(runner, &spec)?;
                    }
                }
                if !runtime.packages.is_empty() {
                    info!(packages = ?runtime.packages, "installing system packages");
                    run_checked(runner, &pm.install_command(&runtime.packages))?;
                }
            }
            None => debug!("package manager disabled"),
        }
    }

    if !runtime.dependencies.is_empty() {
        if let Some((program, args)) = runtime.installer.split_first() {
            info!(dependencies = ?runtime.dependencies, "installing dependencies");
            let spec = CommandSpec::new(program.as_str())
                .args(args.iter().cloned())
                .args(runtime.dependencies.iter().cloned());
            run_checked(runner, &spec)?;
        }
    }

    Ok(())
}
