//! Command-line interface.

pub mod check;
pub mod completions;
pub mod init;
pub mod output;
pub mod region;
pub mod resolve;
pub mod run;
pub mod unit;
pub mod verify;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::core::config::Config;
use crate::core::constants;
use crate::core::pipeline::RunOptions;
use crate::core::region as discovery;
use crate::error::Result;

/// firstboot - provision an application on a fresh instance.
#[derive(Parser)]
#[command(
    name = "firstboot",
    about = "Install an application, resolve its secrets and run it as a systemd service",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(
        short,
        long,
        global = true,
        env = constants::CONFIG_ENV,
        default_value = constants::DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the full bootstrap
    Run {
        /// Skip install and fetch steps that already completed
        #[arg(long)]
        resume: bool,
        /// Do not install system packages or dependencies
        #[arg(long)]
        skip_install: bool,
        /// Do not clone or update the application source
        #[arg(long)]
        skip_fetch: bool,
    },

    /// Resolve configuration and write the env file
    Resolve {
        /// Write here instead of the configured env file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the region the store would be queried in
    Region,

    /// Print the systemd unit
    Unit,

    /// Report whether the service is active
    Verify,

    /// Validate the configuration and print the plan
    Check,

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Execute a command.
pub fn execute(command: Command, config: &Path) -> Result<()> {
    use Command::*;

    match command {
        Run {
            resume,
            skip_install,
            skip_fetch,
        } => run::execute(
            config,
            RunOptions {
                resume,
                skip_install,
                skip_fetch,
            },
        ),
        Resolve { output } => resolve::execute(config, output.as_deref()),
        Region => region::execute(config),
        Unit => unit::execute(config),
        Verify => verify::execute(config),
        Check => check::execute(config),
        Init { force } => init::execute(config, force),
        Completions { shell } => completions::execute(shell),
    }
}

/// Discover the region for `config`, honouring `AWS_REGION`.
pub(crate) fn discover_region(config: &Config) -> discovery::Region {
    let env_region = std::env::var(constants::REGION_ENV_KEY).ok();
    discovery::discover(&config.store, &config.metadata, env_region.as_deref())
}
