//! Loading configuration and journaling through real files.

use std::io::Write;

use adwait_core::config::{Config, ConfigError};
use adwait_core::journal::{read_entries, ActionJournal, JournalEntry};
use serde_json::json;

const ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";

#[test]
fn load_reads_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "contract_address: \"{ADDRESS}\"").unwrap();
    writeln!(file, "rpc_url: \"http://localhost:8545\"").unwrap();
    writeln!(file, "chain_id: 31337").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.chain_id, Some(31337));
    assert_eq!(config.contract_address.to_lowercase(), ADDRESS);
}

#[test]
fn load_rejects_bad_address_in_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "contract_address: \"0x1234\"").unwrap();

    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidContractAddress(_)));
}

#[test]
fn from_file_reports_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn journal_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");

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
                "mint",
                json!({ "to": ADDRESS, "amount": "1000" }),
                "failed: Contract is paused",
            ))
            .unwrap();
    }

    let entries = read_entries(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "pause");
    assert_eq!(entries[1].details["amount"], "1000");
    assert!(entries[1].outcome.starts_with("failed"));
}
