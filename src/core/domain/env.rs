//! Env type.
//!
//! The resolved environment handed to the application: ordered `KEY=value`
//! pairs rendered without quoting and written atomically.

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::atomic;
use crate::core::constants;
use crate::core::validation;
use crate::error::{EnvFileError, Result};

/// The resolved environment.
///
/// Values are wiped from memory when the environment is dropped.
#[derive(Default)]
pub struct Env {
    entries: Vec<(String, Zeroizing<String>)>,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping insertion order.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the key is not a valid variable name or
    /// the value cannot be represented on a single line.
    pub fn push(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let value = Zeroizing::new(value.into());
        validation::validate_key(key)?;
        validation::validate_value(key, &value)?;
        self.entries.push((key.to_string(), value));
        Ok(())
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as env-file text, one `KEY=value` line per entry.
    pub fn render(&self) -> Zeroizing<String> {
        let mut output = Zeroizing::new(String::new());
        for (key, value) in &self.entries {
            output.push_str(key);
            output.push('=');
            output.push_str(value);
            output.push('\n');
        }
        output
    }

    /// SHA-256 of the rendered file, hex encoded.
    ///
    /// Identifies the file contents in logs without revealing them.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.render().as_bytes());
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Atomically write the env file with mode `0600`.
    ///
    /// Any existing file is replaced completely.
    ///
    /// # Errors
    ///
    /// Returns `EnvFileError::Write` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), entries = self.len(), "writing env file");

        let contents = self.render();
        atomic::write_atomic(path, contents.as_bytes(), constants::ENV_FILE_MODE).map_err(
            |source| EnvFileError::Write {
                path: path.to_path_buf(),
                source,
            },
        )?;

        info!(
            path = %path.display(),
            entries = self.len(),
            sha256 = %self.fingerprint(),
            "environment file written"
        );
        Ok(())
    }
}
