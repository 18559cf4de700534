//! Chain adapter implementation.
//!
//! Connects to an EVM JSON-RPC endpoint and exposes the token contract's
//! read and write surface through the [`TokenContract`] trait.

use std::future::Future;
use std::time::Duration;

use alloy::network::{Ethereum, EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use alloy::transports::TransportError;
use thiserror::Error;
use tracing::{debug, info};

use adwait_core::error::RemoteFailure;

use crate::abi::{decode_revert, IAdwaitToken};
use crate::binding::ContractBinding;
use crate::tx::{build_call, WriteCall};

/// Errors from contract reads, writes and confirmation.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The node answered with an error. `revert` names the decoded custom
    /// error when the response carried revert data.
    #[error("RPC error: {message}")]
    Rpc {
        code: Option<i64>,
        revert: Option<&'static str>,
        message: String,
    },
    #[error("URL parse error: {0}")]
    UrlParse(String),
    #[error("ABI decode error: {0}")]
    AbiDecode(String),
    #[error("no wallet connected")]
    NoWallet,
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    #[error("transaction {0} not confirmed after {1} attempts")]
    Unconfirmed(TxHash, u32),
}

impl ContractError {
    pub(crate) fn from_transport(err: TransportError) -> Self {
        let (code, revert) = match err.as_error_resp() {
            Some(payload) => (
                Some(payload.code),
                payload
                    .as_revert_data()
                    .and_then(|data| decode_revert(&data)),
            ),
            None => (None, None),
        };
        Self::Rpc {
            code,
            revert,
            message: err.to_string(),
        }
    }
}

impl RemoteFailure for ContractError {
    fn rpc_code(&self) -> Option<i64> {
        match self {
            Self::Rpc { code, .. } => *code,
            _ => None,
        }
    }

    fn revert_reason(&self) -> Option<&str> {
        match self {
            Self::Rpc { revert, .. } => *revert,
            _ => None,
        }
    }
}

/// Result alias for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

/// The token contract as seen by the views and panels.
pub trait TokenContract: Send + Sync + 'static {
    fn name(&self) -> impl Future<Output = Result<String>> + Send;
    fn symbol(&self) -> impl Future<Output = Result<String>> + Send;
    fn total_supply(&self) -> impl Future<Output = Result<U256>> + Send;
    fn balance_of(&self, account: Address) -> impl Future<Output = Result<U256>> + Send;
    fn paused(&self) -> impl Future<Output = Result<bool>> + Send;
    fn is_admin(&self, account: Address) -> impl Future<Output = Result<bool>> + Send;
    fn is_minter(&self, account: Address) -> impl Future<Output = Result<bool>> + Send;

    /// Sign and broadcast `call`, returning its hash once the node accepts it.
    fn submit(&self, call: WriteCall) -> impl Future<Output = Result<TxHash>> + Send;

    /// Wait until `tx` is included; a reverted receipt is an error.
    fn confirm(&self, tx: TxHash) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy)]
struct Confirmation {
    poll_interval: Duration,
    max_attempts: u32,
}

impl Default for Confirmation {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_attempts: 120,
        }
    }
}

/// An adapter bound to one contract on one RPC endpoint.
///
/// Created with [`EvmAdapter::new`] it is read-only; [`EvmAdapter::with_wallet`]
/// attaches a local signer so writes can be submitted.
pub struct EvmAdapter {
    provider: DynProvider<Ethereum>,
    rpc_url: String,
    binding: ContractBinding,
    sender: Option<Address>,
    confirmation: Confirmation,
}

impl std::fmt::Debug for EvmAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmAdapter")
            .field("rpc_url", &self.rpc_url)
            .field("contract", &self.binding.address())
            .field("sender", &self.sender)
            .finish()
    }
}

fn parse_url(rpc_url: &str) -> Result<alloy::transports::http::reqwest::Url> {
    rpc_url
        .parse()
        .map_err(|e| ContractError::UrlParse(format!("{e}")))
}

impl EvmAdapter {
    /// Creates a read-only adapter.
    pub fn new(rpc_url: &str, binding: ContractBinding) -> Result<Self> {
        let url = parse_url(rpc_url)?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            binding,
            sender: None,
            confirmation: Confirmation::default(),
        })
    }

    /// Creates an adapter that signs writes with `signer`.
    pub fn with_wallet(
        rpc_url: &str,
        binding: ContractBinding,
        signer: PrivateKeySigner,
    ) -> Result<Self> {
        let url = parse_url(rpc_url)?;
        let sender = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            binding,
            sender: Some(sender),
            confirmation: Confirmation::default(),
        })
    }

    /// Overrides how receipts are polled after submission.
    pub fn with_confirmation(mut self, poll_interval: Duration, max_attempts: u32) -> Self {
        self.confirmation = Confirmation {
            poll_interval,
            max_attempts: max_attempts.max(1),
        };
        self
    }

    /// The connected account, if a wallet is attached.
    pub fn account(&self) -> Option<Address> {
        self.sender
    }

    pub fn binding(&self) -> &ContractBinding {
        &self.binding
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Gets the chain ID from the connected node.
    pub async fn get_chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(ContractError::from_transport)
    }

    async fn read<C: SolCall>(&self, call: C) -> Result<C::Return> {
        let tx = TransactionRequest::default()
            .to(self.binding.address())
            .input(Bytes::from(call.abi_encode()).into());

        let result: Bytes = self
            .provider
            .call(tx)
            .await
            .map_err(ContractError::from_transport)?;

        C::abi_decode_returns(&result).map_err(|e| ContractError::AbiDecode(e.to_string()))
    }
}

impl TokenContract for EvmAdapter {
    async fn name(&self) -> Result<String> {
        self.read(IAdwaitToken::nameCall {}).await
    }

    async fn symbol(&self) -> Result<String> {
        self.read(IAdwaitToken::symbolCall {}).await
    }

    async fn total_supply(&self) -> Result<U256> {
        self.read(IAdwaitToken::totalSupplyCall {}).await
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        self.read(IAdwaitToken::balanceOfCall { account }).await
    }

    async fn paused(&self) -> Result<bool> {
        self.read(IAdwaitToken::pausedCall {}).await
    }

    async fn is_admin(&self, account: Address) -> Result<bool> {
        self.read(IAdwaitToken::isAdminCall { account }).await
    }

    async fn is_minter(&self, account: Address) -> Result<bool> {
        self.read(IAdwaitToken::isMinterCall { account }).await
    }

    async fn submit(&self, call: WriteCall) -> Result<TxHash> {
        let sender = self.sender.ok_or(ContractError::NoWallet)?;
        let tx = build_call(&self.binding, &call).from(sender);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(ContractError::from_transport)?;
        let tx_hash = *pending.tx_hash();
        info!(function = call.function_name(), %tx_hash, "transaction broadcast");
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<()> {
        let mut attempts = 0u32;
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(ContractError::from_transport)?;
            if let Some(receipt) = receipt {
                return if ReceiptResponse::status(&receipt) {
                    Ok(())
                } else {
                    Err(ContractError::Reverted(tx_hash))
                };
            }
            attempts += 1;
            if attempts >= self.confirmation.max_attempts {
                return Err(ContractError::Unconfirmed(tx_hash, attempts));
            }
            debug!(%tx_hash, attempts, "receipt not yet available");
            tokio::time::sleep(self.confirmation.poll_interval).await;
        }
    }
}
