//! Wallet connection.
//!
//! Unlocks a local signer either from an encrypted V3 keystore or from a raw
//! hex private key. Creating or exporting keys is out of scope.

use std::path::Path;

use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;

/// Environment variable holding a hex private key.
pub const ENV_PRIVATE_KEY: &str = "ADWAIT_PRIVATE_KEY";

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("keystore {path} not found")]
    KeystoreNotFound { path: String },
    #[error("keystore crypto error: {0}")]
    Keystore(String),
    #[error("invalid private key: {0}")]
    InvalidKey(String),
}

/// Decrypts the keystore at `path` with `password`.
pub fn unlock_keystore(path: &Path, password: &str) -> Result<PrivateKeySigner, WalletError> {
    if !path.exists() {
        return Err(WalletError::KeystoreNotFound {
            path: path.display().to_string(),
        });
    }
    let secret = eth_keystore::decrypt_key(path, password)
        .map_err(|e| WalletError::Keystore(e.to_string()))?;

    PrivateKeySigner::from_slice(&secret).map_err(|e| WalletError::InvalidKey(e.to_string()))
}

/// Parses a hex private key, with or without `0x`.
pub fn from_private_key(hex: &str) -> Result<PrivateKeySigner, WalletError> {
    hex.trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| WalletError::InvalidKey(e.to_string()))
}
