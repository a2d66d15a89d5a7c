//! firstboot - first-boot provisioner.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use firstboot::cli::output;
use firstboot::cli::{execute, Cli};
use firstboot::core::constants;
use firstboot::error::{ConfigError, Error, HostError, ResolveError, StoreError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("firstboot=debug")
        } else {
            EnvFilter::new("firstboot=info")
        }
    });

    let json = std::env::var(constants::LOG_FORMAT_ENV).is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    if let Err(e) = execute(cli.command, &cli.config) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotFound(_)) => Some("run: firstboot init".to_string()),
            Error::Config(ConfigError::AlreadyExists(_)) => {
                Some("pass --force to overwrite it".to_string())
            }
            Error::Resolve(ResolveError::RequiredUnavailable { .. }) => Some(
                "check that the instance role can read the store and the name is correct"
                    .to_string(),
            ),
            Error::Store(StoreError::Unsupported(_)) => {
                Some("rebuild with --features aws, or set [store] backend = \"file\"".to_string())
            }
            Error::Host(HostError::ProgramNotFound(program)) => {
                Some(format!("install {} or add it to PATH", program))
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}
