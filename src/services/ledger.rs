//! Completion ledger
//!
//! Persists per-directory outcomes between runs so reruns skip finished
//! releases and retry only failures. "Never attempted" is the absence of a
//! key, not a third stored value.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScrapeError;

/// Outcome of one processed release directory, stored as a JSON boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum ItemStatus {
    Done,
    Failed,
}

impl From<bool> for ItemStatus {
    fn from(done: bool) -> Self {
        if done { ItemStatus::Done } else { ItemStatus::Failed }
    }
}

impl From<ItemStatus> for bool {
    fn from(status: ItemStatus) -> Self {
        matches!(status, ItemStatus::Done)
    }
}

/// Mapping from release directory to completion status. Loaded once at
/// startup, mutated during the run, persisted once at the end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ledger {
    entries: BTreeMap<String, ItemStatus>,
}

impl Ledger {
    /// Load the ledger, treating a missing file as empty. A file that exists
    /// but does not parse is a hard error: silently resetting it would
    /// re-scrape every release.
    pub fn load(path: &Path) -> Result<Self, ScrapeError> {
        if !path.exists() {
            debug!(path = %path.display(), "No ledger file, starting empty");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let entries = serde_json::from_str(&raw).map_err(|source| ScrapeError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { entries })
    }

    /// Persist the ledger as pretty-printed JSON with stable key order,
    /// rewriting the file in full.
    pub fn save(&self, path: &Path) -> Result<(), ScrapeError> {
        let mut raw =
            serde_json::to_string_pretty(&self.entries).map_err(std::io::Error::from)?;
        raw.push('\n');
        fs::write(path, raw)?;
        Ok(())
    }

    pub fn status(&self, dir: &str) -> Option<ItemStatus> {
        self.entries.get(dir).copied()
    }

    pub fn record(&mut self, dir: &str, status: ItemStatus) {
        self.entries.insert(dir.to_string(), status);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::load(&dir.path().join("result.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");

        let mut ledger = Ledger::default();
        ledger.record("/media/ABC-123", ItemStatus::Done);
        ledger.record("/media/DEF-456", ItemStatus::Failed);
        ledger.save(&path).unwrap();

        let reloaded = Ledger::load(&path).unwrap();
        assert_eq!(reloaded, ledger);
    }

    #[test]
    fn test_statuses_persist_as_booleans() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");

        let mut ledger = Ledger::default();
        ledger.record("/media/ABC-123", ItemStatus::Done);
        ledger.record("/media/DEF-456", ItemStatus::Failed);
        ledger.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"/media/ABC-123\": true"));
        assert!(raw.contains("\"/media/DEF-456\": false"));
    }

    #[test]
    fn test_boolean_file_loads_as_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        std::fs::write(&path, "{\n    \"/media/ABC-123\": true\n}\n").unwrap();

        let ledger = Ledger::load(&path).unwrap();
        assert_eq!(ledger.status("/media/ABC-123"), Some(ItemStatus::Done));
        assert_eq!(ledger.status("/media/XYZ-999"), None);
    }

    #[test]
    fn test_malformed_file_fails_loudly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        std::fs::write(&path, "not json at all").unwrap();

        assert_matches!(Ledger::load(&path), Err(ScrapeError::Format { .. }));
    }

    #[test]
    fn test_record_overwrites() {
        let mut ledger = Ledger::default();
        ledger.record("/media/ABC-123", ItemStatus::Failed);
        ledger.record("/media/ABC-123", ItemStatus::Done);
        assert_eq!(ledger.status("/media/ABC-123"), Some(ItemStatus::Done));
        assert_eq!(ledger.len(), 1);
    }
}
