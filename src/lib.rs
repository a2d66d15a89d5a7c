//! firstboot - turn a bare instance into a running, supervised application.
//!
//! Runs once at first boot. It installs the runtime, checks out the
//! application, resolves its configuration from a secret/parameter store
//! into an env file, and installs and starts a systemd service.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── run           # Full bootstrap
//! │   ├── resolve       # Configuration step only
//! │   ├── region        # Region discovery
//! │   ├── unit          # Rendered systemd unit
//! │   ├── verify        # Service status
//! │   ├── check         # Config validation and plan
//! │   ├── init          # Starter firstboot.toml
//! │   └── completions   # Shell completions
//! ├── core/             # Core library components
//! │   ├── config        # firstboot.toml management
//! │   ├── domain/       # Env, Parameter, Stage
//! │   ├── store/        # ConfigStore trait, aws and file backends
//! │   ├── region        # IMDSv2 region discovery
//! │   ├── retry         # Bounded fixed-delay retry
//! │   ├── resolve       # Parameters to Env
//! │   ├── host/         # Packages, source checkout, systemd
//! │   ├── journal       # Completed steps, for --resume
//! │   └── pipeline      # Ordered bootstrap steps
//! └── testing           # In-memory store, runner and sleeper
//! ```
//!
//! # Guarantees
//!
//! - A required parameter that cannot be read aborts the run before the env
//!   file, the unit or any `systemctl` call.
//! - Optional parameters fall back to their default and never abort.
//! - The env file is replaced atomically with mode `0600`.
//! - A service that is not active after start is a warning, not a failure.

pub mod cli;
pub mod core;
pub mod error;
pub mod testing;
