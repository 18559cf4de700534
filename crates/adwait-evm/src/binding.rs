//! Validated reference to the deployed token contract.

use alloy::primitives::Address;
use thiserror::Error;

use adwait_core::format::is_well_formed_address;

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("invalid contract address '{0}': expected 0x followed by 40 hex characters")]
    InvalidAddress(String),
}

/// Address of the token contract every read and write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractBinding {
    address: Address,
}

impl ContractBinding {
    /// Parse a `0x`-prefixed address; mixed case must carry a valid checksum.
    pub fn parse(s: &str) -> Result<Self, BindingError> {
        let s = s.trim();
        if !is_well_formed_address(s) {
            return Err(BindingError::InvalidAddress(s.to_string()));
        }
        let address = s
            .parse::<Address>()
            .map_err(|_| BindingError::InvalidAddress(s.to_string()))?;
        Ok(Self { address })
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

impl std::fmt::Display for ContractBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}
