//! Local file store.
//!
//! Reads secrets and parameters from a TOML document:
//!
//! ```toml
//! [secrets."discord-bot/secrets"]
//! bot_token = "abc"
//!
//! [secrets]
//! raw = '{"already": "json"}'
//!
//! [parameters]
//! "/discord/env" = "PROD"
//! ```
//!
//! A secret given as a table is handed out as its JSON rendering, the same
//! shape a Secrets Manager document has. A secret given as a string is
//! returned unchanged.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::ConfigStore;
use crate::error::{Result, StoreError};

#[derive(Debug, Default, Deserialize)]
struct Document {
    #[serde(default)]
    secrets: BTreeMap<String, toml::Value>,
    #[serde(default)]
    parameters: BTreeMap<String, String>,
}

/// Store backed by a TOML file, loaded once at open.
#[derive(Debug)]
pub struct FileStore {
    document: Document,
}

impl FileStore {
    /// Read and parse the store document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFile` or `StoreError::Parse`.
    pub fn open(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| StoreError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Document = toml::from_str(&contents).map_err(StoreError::Parse)?;

        debug!(
            path = %path.display(),
            secrets = document.secrets.len(),
            parameters = document.parameters.len(),
            "file store loaded"
        );
        Ok(Self { document })
    }
}

impl ConfigStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get_secret(&self, id: &str) -> Result<String> {
        match self.document.secrets.get(id) {
            Some(toml::Value::String(raw)) => Ok(raw.clone()),
            Some(value @ toml::Value::Table(_)) => {
                serde_json::to_string(value).map_err(|e| {
                    StoreError::InvalidSecret {
                        id: id.to_string(),
                        reason: e.to_string(),
                    }
                    .into()
                })
            }
            Some(other) => Err(StoreError::InvalidSecret {
                id: id.to_string(),
                reason: format!("expected a string or table, found {}", other.type_str()),
            }
            .into()),
            None => Err(StoreError::NotFound(id.to_string()).into()),
        }
    }

    fn get_parameter(&self, name: &str, _decrypt: bool) -> Result<String> {
        self.document
            .parameters
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()).into())
    }
}
