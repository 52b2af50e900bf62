//! history::snapshot
//!
//! JSON snapshot format for a job's build history.
//!
//! # Format
//!
//! ```json
//! {
//!   "job": "acme/main",
//!   "builds": [
//!     { "number": 1, "result": "SUCCESS",
//!       "analyses": [ { "tool": "checkstyle", "successful": true, "issues": [] } ] },
//!     { "number": 2, "result": "UNSTABLE", "previous": 1,
//!       "analyses": [ { "tool": "checkstyle", "successful": false } ] }
//!   ]
//! }
//! ```
//!
//! Builds may appear in any order; they are inserted oldest first so that
//! every predecessor exists before it is referenced. An analysis without an
//! `issues` key is an outcome whose result data was not kept.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{BuildHistory, BuildRecord, HistoryError};

/// On-disk representation of a [`BuildHistory`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistorySnapshot {
    pub job: String,
    #[serde(default)]
    pub builds: Vec<BuildRecord>,
}

impl HistorySnapshot {
    /// Validate the snapshot and build the history.
    pub fn into_history(mut self) -> Result<BuildHistory, HistoryError> {
        self.builds.sort_by_key(|record| record.number);

        let mut history = BuildHistory::new(self.job);
        for record in self.builds {
            history.add_build(record)?;
        }
        Ok(history)
    }
}

impl From<&BuildHistory> for HistorySnapshot {
    fn from(history: &BuildHistory) -> Self {
        Self {
            job: history.job.clone(),
            builds: history.builds.values().cloned().collect(),
        }
    }
}

impl BuildHistory {
    /// Parse a history from its JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, HistoryError> {
        let snapshot: HistorySnapshot =
            serde_json::from_str(json).map_err(|e| HistoryError::Parse(e.to_string()))?;
        snapshot.into_history()
    }

    /// Read and parse a history snapshot file.
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        let contents = fs::read_to_string(path).map_err(|e| HistoryError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let history = Self::from_json(&contents)?;
        log::debug!(
            "loaded {} builds of '{}' from {}",
            history.len(),
            history.job(),
            path.display()
        );
        Ok(history)
    }

    /// Serialize this history as a pretty-printed JSON snapshot.
    pub fn to_json(&self) -> Result<String, HistoryError> {
        serde_json::to_string_pretty(&HistorySnapshot::from(self))
            .map_err(|e| HistoryError::Parse(e.to_string()))
    }
}
