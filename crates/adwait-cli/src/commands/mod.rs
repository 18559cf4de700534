//! CLI subcommand implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adwait_core::config::Config;
use adwait_core::journal::{ActionJournal, SharedJournal};
use adwait_evm::wallet::{self, ENV_PRIVATE_KEY};
use adwait_evm::{ContractBinding, EvmAdapter, PrivateKeySigner};

pub mod dashboard;
pub mod read;
pub mod write;

pub(crate) type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub(crate) fn resolve_data_dir(data_dir: Option<PathBuf>) -> CliResult<PathBuf> {
    if let Some(dir) = data_dir {
        return Ok(dir);
    }

    let home = dirs::home_dir().ok_or("could not determine home directory")?;
    Ok(home.join(".adwait"))
}

pub(crate) fn resolve_config_path(config: Option<PathBuf>) -> CliResult<PathBuf> {
    match config {
        Some(path) => Ok(path),
        None => Ok(resolve_data_dir(None)?.join("config.yaml")),
    }
}

/// Validated configuration plus the contract it points at.
pub(crate) struct Session {
    pub config: Config,
    pub binding: ContractBinding,
}

impl Session {
    pub fn load(config: Option<PathBuf>) -> CliResult<Self> {
        let path = resolve_config_path(config)?;
        tracing::info!("loading config from {}", path.display());
        let config = Config::load(&path)?;
        let binding = ContractBinding::parse(&config.contract_address)?;
        Ok(Self { config, binding })
    }

    /// Adapter for visitors without a wallet.
    pub fn read_only(&self) -> CliResult<EvmAdapter> {
        let adapter = EvmAdapter::new(&self.config.rpc_url, self.binding)?;
        Ok(self.tuned(adapter))
    }

    pub fn signing(&self, signer: PrivateKeySigner) -> CliResult<EvmAdapter> {
        let adapter = EvmAdapter::with_wallet(&self.config.rpc_url, self.binding, signer)?;
        Ok(self.tuned(adapter))
    }

    fn tuned(&self, adapter: EvmAdapter) -> EvmAdapter {
        let confirmation = &self.config.confirmation;
        adapter.with_confirmation(confirmation.poll_interval(), confirmation.max_attempts)
    }

    pub fn journal(&self) -> CliResult<Option<SharedJournal>> {
        match &self.config.journal_path {
            Some(path) => Ok(Some(open_journal(path)?)),
            None => Ok(None),
        }
    }

    /// Refuses to talk to a node on a different chain than configured.
    pub async fn verify_chain(&self, adapter: &EvmAdapter) -> CliResult {
        let Some(expected) = self.config.chain_id else {
            return Ok(());
        };
        let actual = adapter.get_chain_id().await?;
        if actual != expected {
            return Err(format!(
                "chain ID mismatch: config expects {expected}, node at {} reports {actual}",
                adapter.rpc_url()
            )
            .into());
        }
        Ok(())
    }
}

fn open_journal(path: &Path) -> CliResult<SharedJournal> {
    let journal = ActionJournal::open_shared(path)?;
    tracing::info!("journaling actions to {}", path.display());
    Ok(journal)
}

/// Where the signing key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WalletSource {
    PrivateKey(String),
    Keystore(PathBuf),
}

impl WalletSource {
    /// `ADWAIT_PRIVATE_KEY`, then `--keystore`, then `keystore_path`.
    pub fn resolve(keystore: Option<PathBuf>, config: &Config) -> Option<Self> {
        Self::resolve_with(std::env::var(ENV_PRIVATE_KEY).ok(), keystore, config)
    }

    fn resolve_with(
        private_key: Option<String>,
        keystore: Option<PathBuf>,
        config: &Config,
    ) -> Option<Self> {
        if let Some(key) = private_key.filter(|key| !key.trim().is_empty()) {
            return Some(Self::PrivateKey(key));
        }
        keystore
            .or_else(|| config.keystore_path.clone())
            .map(Self::Keystore)
    }

    pub fn needs_password(&self) -> bool {
        matches!(self, Self::Keystore(_))
    }

    pub fn unlock(&self, password: Option<&str>) -> CliResult<PrivateKeySigner> {
        let signer = match self {
            Self::PrivateKey(key) => wallet::from_private_key(key)?,
            Self::Keystore(path) => {
                let password = password.ok_or("keystore password required")?;
                wallet::unlock_keystore(path, password)?
            }
        };
        tracing::info!(account = %signer.address(), "wallet unlocked");
        Ok(signer)
    }
}

pub(crate) fn prompt_password() -> CliResult<String> {
    eprint!("Keystore password: ");
    Ok(rpassword::read_password()?)
}

/// Unlocks the wallet and returns a signing adapter on the configured chain.
pub(crate) async fn connect(
    session: &Session,
    source: &WalletSource,
    password: Option<&str>,
) -> CliResult<Arc<EvmAdapter>> {
    let signer = source.unlock(password)?;
    let adapter = session.signing(signer)?;
    session.verify_chain(&adapter).await?;
    Ok(Arc::new(adapter))
}
