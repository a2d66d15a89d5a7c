//! Host operations.
//!
//! Everything that touches the machine outside of file writes goes through
//! a [`CommandRunner`]: package installs, git, and systemd.
//!
//! - `packages`: system package manager detection and installs
//! - `source`: application checkout and dependency install
//! - `service`: unit rendering, registration, start and verification

pub mod packages;
pub mod service;
pub mod source;

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::core::constants;
use crate::error::{HostError, Result};

/// A command to run on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Shell-like rendering for logs and error messages.
    pub fn display(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self {
            status: Some(0),
            ..Self::default()
        }
    }

    pub fn failure(code: i32, stderr: &str) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    fn status_text(&self) -> String {
        match self.status {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Executes host commands.
pub trait CommandRunner {
    /// Run a command to completion and capture its output.
    ///
    /// A non-zero exit is not an error here; see [`run_checked`].
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;

    /// Whether `program` can be found on `PATH`.
    fn exists(&self, program: &str) -> bool;
}

/// Runs commands with `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        debug!(command = %spec, "running");

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).stdin(Stdio::null());
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }
        for (key, value) in &spec.env {
            command.env(key, value);
        }

        let output = command.output().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                HostError::ProgramNotFound(spec.program.clone())
            } else {
                HostError::Spawn {
                    program: spec.program.clone(),
                    source,
                }
            }
        })?;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        for line in result.stdout.lines().chain(result.stderr.lines()) {
            trace!(program = %spec.program, "{}", line);
        }
        debug!(command = %spec, status = ?result.status, "finished");

        Ok(result)
    }

    fn exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Run a command and fail on a non-zero exit.
///
/// # Errors
///
/// Returns `HostError::CommandFailed` carrying the tail of stderr.
pub fn run_checked(runner: &dyn CommandRunner, spec: &CommandSpec) -> Result<CommandOutput> {
    let output = runner.run(spec)?;
    if output.is_success() {
        return Ok(output);
    }

    Err(HostError::CommandFailed {
        command: spec.display(),
        status: output.status_text(),
        stderr: tail(&output.stderr, constants::STDERR_TAIL_LINES),
    }
    .into())
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
