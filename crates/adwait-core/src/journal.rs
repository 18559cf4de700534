//! Append-only journal of settled contract actions.
//!
//! Every write that reaches a terminal state is recorded as one JSON line so
//! the operator can reconstruct what was submitted and how it ended.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the action journal.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One settled action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    /// Contract function that was called (e.g. `"mint"`).
    pub action: String,
    /// Arguments and transaction hash, when known.
    pub details: serde_json::Value,
    /// `"confirmed"` or `"failed: <message>"`.
    pub outcome: String,
}

impl JournalEntry {
    pub fn new(
        action: impl Into<String>,
        details: serde_json::Value,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            action: action.into(),
            details,
            outcome: outcome.into(),
        }
    }
}

/// JSONL writer for [`JournalEntry`] records.
pub struct ActionJournal {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// A journal shared between panels.
pub type SharedJournal = Arc<Mutex<ActionJournal>>;

impl ActionJournal {
    /// Open (creating parent directories) a journal file for appending.
    pub fn open(path: &Path) -> Result<Self, JournalError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    /// Open a journal wrapped for sharing.
    pub fn open_shared(path: &Path) -> Result<SharedJournal, JournalError> {
        Ok(Arc::new(Mutex::new(Self::open(path)?)))
    }

    /// Append one entry; flushed immediately.
    pub fn record(&mut self, entry: &JournalEntry) -> Result<(), JournalError> {
        let line = serde_json::to_string(entry)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read every entry back from a journal file.
pub fn read_entries(path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
    let contents = std::fs::read_to_string(path)?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(JournalError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_serializes() {
        let entry = JournalEntry::new("mint", json!({"to": "0xabc", "amount": "100"}), "confirmed");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"action\":\"mint\""));
        assert!(json.contains("\"outcome\":\"confirmed\""));
        assert!(json.contains("\"timestamp\""));
    }

    #[test]
    fn journal_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("journal.jsonl");

        {
            let mut journal = ActionJournal::open(&path).unwrap();
            journal
                .record(&JournalEntry::new("pause", json!({}), "confirmed"))
                .unwrap();
        }
        {
            let mut journal = ActionJournal::open(&path).unwrap();
            journal
                .record(&JournalEntry::new(
                    "transfer",
                    json!({"to": "0x01"}),
                    "failed: Insufficient token balance",
                ))
                .unwrap();
        }

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "pause");
        assert_eq!(entries[1].action, "transfer");
        assert!(entries[1].outcome.starts_with("failed"));
    }
}
