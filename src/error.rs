//! Error types.
//!
//! Each concern has its own error enum; [`Error`] wraps them so that
//! operations across modules can share a single [`Result`] alias.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    EnvFile(#[from] EnvFileError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading or validating `firstboot.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("config file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("invalid parameter '{env}': {reason}")]
    InvalidParameter { env: String, reason: String },

    #[error("duplicate environment key: {0}")]
    DuplicateKey(String),
}

/// Errors talking to the configuration store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unsupported(String),

    #[error("not found in store: {0}")]
    NotFound(String),

    #[error("request for '{name}' failed: {reason}")]
    Request { name: String, reason: String },

    #[error("secret '{id}' is not usable: {reason}")]
    InvalidSecret { id: String, reason: String },

    #[error("failed to read store file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse store file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to start async runtime: {0}")]
    Runtime(String),
}

/// Fatal outcomes of configuration resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("failed to get {name} after {attempts} attempts: {reason}")]
    RequiredUnavailable {
        name: String,
        attempts: u32,
        reason: String,
    },

    #[error("required value {name} is empty")]
    EmptyValue { name: String },

    #[error("secret '{secret_id}' has no field '{field}'")]
    MissingField { secret_id: String, field: String },
}

/// Errors writing the environment file.
#[derive(Error, Debug)]
pub enum EnvFileError {
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from host-level operations (packages, git, systemd).
#[derive(Error, Debug)]
pub enum HostError {
    #[error("program not found: {0}")]
    ProgramNotFound(String),

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command failed ({status}): {command}{}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("no supported package manager found (tried dnf, yum, apt-get)")]
    NoPackageManager,

    #[error("{0} exists and is not a git checkout")]
    NotACheckout(PathBuf),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.trim().is_empty() {
        String::new()
    } else {
        format!("\n{}", stderr.trim_end())
    }
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("environment key cannot be empty")]
    EmptyKey,

    #[error("invalid environment key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value for {0} contains a line break and cannot be written to an env file")]
    MultilineValue(String),
}

/// Errors from the instance metadata service. Never fatal: discovery falls
/// back to a fixed region.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("metadata request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata returned an empty region")]
    EmptyRegion,
}

pub type Result<T> = std::result::Result<T, Error>;
