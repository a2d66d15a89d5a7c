//! Run journal.
//!
//! Records which steps of a bootstrap completed, so `run --resume` can skip
//! the slow host steps that already succeeded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::atomic;
use crate::core::constants;
use crate::core::domain::Step;

/// Completed steps with their completion times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: BTreeMap<Step, DateTime<Utc>>,
    #[serde(skip)]
    path: PathBuf,
}

impl Journal {
    /// A fresh journal that will be saved at `path`.
    pub fn new(path: &Path) -> Self {
        Self {
            started_at: Utc::now(),
            completed: BTreeMap::new(),
            path: path.to_path_buf(),
        }
    }

    /// Load the journal at `path`.
    ///
    /// A missing or unreadable journal yields a fresh one.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no journal");
                return Self::new(path);
            }
        };

        match serde_json::from_str::<Journal>(&contents) {
            Ok(mut journal) => {
                journal.path = path.to_path_buf();
                debug!(path = %path.display(), completed = journal.completed.len(), "journal loaded");
                journal
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "journal is corrupt, starting over");
                Self::new(path)
            }
        }
    }

    pub fn is_done(&self, step: Step) -> bool {
        self.completed.contains_key(&step)
    }

    /// Mark `step` complete and persist.
    ///
    /// The journal is an optimisation; failing to save it only warns.
    pub fn record(&mut self, step: Step) {
        self.completed.insert(step, Utc::now());
        self.save();
    }

    /// Forget every completed step and persist.
    pub fn reset(&mut self) {
        self.started_at = Utc::now();
        self.completed.clear();
        self.save();
    }

    fn save(&self) {
        let result = serde_json::to_vec_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|bytes| {
                atomic::write_atomic(&self.path, &bytes, constants::PUBLIC_FILE_MODE)
            });
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "failed to save journal");
        }
    }
}
