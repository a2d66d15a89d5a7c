//! Configuration store access.
//!
//! Secrets and parameters are read through the [`ConfigStore`] trait so the
//! resolver never talks to a particular backend directly.
//!
//! ## Backends
//!
//! - `aws`: Secrets Manager and SSM Parameter Store (feature `aws`)
//! - `file`: a local TOML document, for development and tests
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `ConfigStore` trait in a new file
//! 2. Add a variant to `StoreBackend` in the config
//! 3. Construct it in [`open`]

use tracing::debug;

use crate::core::config::{StoreBackend, StoreConfig};
use crate::error::{ConfigError, Result};

#[cfg(feature = "aws")]
mod aws;
mod file;

#[cfg(feature = "aws")]
pub use aws::AwsStore;
pub use file::FileStore;

/// Read access to a configuration store.
///
/// Implementations make a single request per call. Retrying is the
/// caller's business.
pub trait ConfigStore {
    /// Backend name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the raw string of a secret document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when the secret does not exist, or
    /// another `StoreError` when the request fails.
    fn get_secret(&self, id: &str) -> Result<String>;

    /// Fetch a parameter value, decrypting it when `decrypt` is set.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when the parameter does not exist, or
    /// another `StoreError` when the request fails.
    fn get_parameter(&self, name: &str, decrypt: bool) -> Result<String>;
}

/// Open the configured backend for `region`.
///
/// # Errors
///
/// Returns `StoreError::Unsupported` when the binary was built without the
/// requested backend, or the backend's own error when it cannot start.
pub fn open(config: &StoreConfig, region: &str) -> Result<Box<dyn ConfigStore>> {
    debug!(backend = ?config.backend, region, "opening store");

    match config.backend {
        StoreBackend::File => {
            let path = config
                .path
                .as_deref()
                .ok_or(ConfigError::MissingField { field: "store.path" })?;
            Ok(Box::new(FileStore::open(path)?))
        }
        #[cfg(feature = "aws")]
        StoreBackend::Aws => Ok(Box::new(AwsStore::connect(region)?)),
        #[cfg(not(feature = "aws"))]
        StoreBackend::Aws => Err(crate::error::StoreError::Unsupported(
            "built without the `aws` feature".to_string(),
        )
        .into()),
    }
}
