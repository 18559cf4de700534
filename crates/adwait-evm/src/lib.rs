//! # adwait-evm
//!
//! AdwaitToken contract binding and chain adapter.
//!
//! ## Modules
//!
//! - [`abi`] — contract ABI using alloy's `sol!` macro
//! - [`binding`] — validated contract address
//! - [`tx`] — write calls and transaction building
//! - [`adapter`] — [`TokenContract`] trait and the JSON-RPC [`EvmAdapter`]
//! - [`wallet`] — unlocking a local signer

pub mod abi;
pub mod adapter;
pub mod binding;
pub mod tx;
pub mod wallet;

pub use adapter::{ContractError, EvmAdapter, TokenContract};
pub use binding::{BindingError, ContractBinding};
pub use tx::WriteCall;
pub use wallet::WalletError;

// Re-export alloy types used in the public API.
pub use alloy::primitives::{Address, TxHash, U256};
pub use alloy::signers::local::PrivateKeySigner;
