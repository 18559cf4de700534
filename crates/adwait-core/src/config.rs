//! Dashboard configuration.
//!
//! Loads `config.yaml`, applies environment overrides and validates the
//! result. A malformed contract address is a fatal startup error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::format::is_well_formed_address;

/// Environment variable overriding `contract_address`.
pub const ENV_CONTRACT_ADDRESS: &str = "ADWAIT_CONTRACT_ADDRESS";
/// Environment variable overriding `rpc_url`.
pub const ENV_RPC_URL: &str = "ADWAIT_RPC_URL";

/// Monad testnet, where the AdwaitToken is deployed.
pub const DEFAULT_RPC_URL: &str = "https://testnet-rpc.monad.xyz";

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("contract_address is required (set it in config.yaml or ADWAIT_CONTRACT_ADDRESS)")]
    MissingContractAddress,
    #[error("invalid contract_address '{0}': must be 0x-prefixed followed by 40 hex characters")]
    InvalidContractAddress(String),
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

/// Polling cadence of the read views.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Refresh interval for supply, balance and pause state.
    pub stats_interval_ms: u64,
    /// Refresh interval for role flags.
    pub roles_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            stats_interval_ms: 3_000,
            roles_interval_ms: 5_000,
        }
    }
}

impl PollingConfig {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval_ms)
    }

    pub fn roles_interval(&self) -> Duration {
        Duration::from_millis(self.roles_interval_ms)
    }
}

/// How long to wait for a submitted transaction to be included.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    pub poll_interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            max_attempts: 120,
        }
    }
}

impl ConfirmationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Parsed dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address of the AdwaitToken contract.
    #[serde(default)]
    pub contract_address: String,
    /// JSON-RPC endpoint of the network the contract lives on.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Expected chain ID; checked against the node when set.
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// Encrypted V3 keystore used to connect a wallet.
    #[serde(default)]
    pub keystore_path: Option<PathBuf>,
    /// Where settled actions are journaled (JSONL).
    #[serde(default)]
    pub journal_path: Option<PathBuf>,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

impl Config {
    /// Parse configuration from a YAML string without validating it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file without validating it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Load, apply environment overrides and validate.
    ///
    /// A missing file is not an error: the environment alone may supply the
    /// required settings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::from_yaml("{}")?
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(address) = lookup(ENV_CONTRACT_ADDRESS) {
            self.contract_address = address;
        }
        if let Some(url) = lookup(ENV_RPC_URL) {
            self.rpc_url = url;
        }
    }

    /// Check every setting; the contract address must be well formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let address = self.contract_address.trim();
        if address.is_empty() {
            return Err(ConfigError::MissingContractAddress);
        }
        if !is_well_formed_address(address) {
            return Err(ConfigError::InvalidContractAddress(address.to_string()));
        }
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: "rpc_url",
                reason: "must not be empty".into(),
            });
        }
        if self.chain_id == Some(0) {
            return Err(ConfigError::InvalidSetting {
                key: "chain_id",
                reason: "must be greater than 0".into(),
            });
        }
        if self.polling.stats_interval_ms == 0 || self.polling.roles_interval_ms == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "polling",
                reason: "intervals must be greater than 0".into(),
            });
        }
        if self.confirmation.poll_interval_ms == 0 || self.confirmation.max_attempts == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "confirmation",
                reason: "poll_interval_ms and max_attempts must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";

    #[test]
    fn minimal_yaml_uses_defaults() {
        let config = Config::from_yaml(&format!("contract_address: \"{ADDRESS}\"")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.polling.stats_interval(), Duration::from_secs(3));
        assert_eq!(config.polling.roles_interval(), Duration::from_secs(5));
        assert_eq!(config.confirmation.max_attempts, 120);
        assert!(config.keystore_path.is_none());
    }

    #[test]
    fn full_yaml() {
        let yaml = format!(
            r#"
contract_address: "{ADDRESS}"
rpc_url: "http://localhost:8545"
chain_id: 31337
keystore_path: "/tmp/keys/alice.json"
journal_path: "/tmp/journal.jsonl"
polling:
  stats_interval_ms: 1000
confirmation:
  poll_interval_ms: 250
  max_attempts: 8
"#
        );
        let config = Config::from_yaml(&yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.chain_id, Some(31337));
        assert_eq!(config.polling.stats_interval_ms, 1000);
        // Unset nested keys keep their defaults.
        assert_eq!(config.polling.roles_interval_ms, 5000);
        assert_eq!(config.confirmation.poll_interval(), Duration::from_millis(250));
        assert_eq!(
            config.keystore_path.as_deref(),
            Some(Path::new("/tmp/keys/alice.json"))
        );
    }

    #[test]
    fn missing_address_rejected() {
        let config = Config::from_yaml("rpc_url: http://localhost:8545").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingContractAddress)
        ));
    }

    #[test]
    fn malformed_address_rejected() {
        for bad in ["0x1234", "1234567890abcdef1234567890abcdef12345678", "0xnothex"] {
            let config = Config::from_yaml(&format!("contract_address: \"{bad}\"")).unwrap();
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidContractAddress(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn zero_intervals_rejected() {
        let yaml = format!("contract_address: \"{ADDRESS}\"\npolling:\n  stats_interval_ms: 0\n");
        let config = Config::from_yaml(&yaml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting { key: "polling", .. })
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::from_yaml("contract_address: \"0xbad\"").unwrap();
        config.apply_overrides(|key| match key {
            ENV_CONTRACT_ADDRESS => Some(ADDRESS.to_string()),
            ENV_RPC_URL => Some("http://127.0.0.1:8545".to_string()),
            _ => None,
        });
        config.validate().unwrap();
        assert_eq!(config.contract_address, ADDRESS);
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        assert!(matches!(
            Config::from_yaml("contract_address: [unclosed"),
            Err(ConfigError::Parse(_))
        ));
    }
}
