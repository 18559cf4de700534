//! Read views: token statistics and the connected account's roles.
//!
//! Each field is fetched by its own scoped poller and published through a
//! `watch` channel. Fields update independently; a failed read clears only
//! that field.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::warn;

use adwait_core::format::{to_display_amount, TOKEN_DECIMALS};
use adwait_core::roles::RoleFlags;
use adwait_evm::{Address, ContractError, TokenContract, U256};

use crate::poll::PollHandle;

pub const DEFAULT_NAME: &str = "AdwaitToken";
pub const DEFAULT_SYMBOL: &str = "ADWT";
pub const CONNECT_WALLET: &str = "Connect Wallet";

/// Latest known token state. `None` means not loaded or last read failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSnapshot {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub total_supply: Option<U256>,
    pub balance: Option<U256>,
    pub paused: Option<bool>,
}

impl TokenSnapshot {
    /// Reads every field once, concurrently.
    pub async fn fetch<C: TokenContract>(contract: &C, account: Option<Address>) -> Self {
        let balance = async {
            match account {
                Some(account) => Some(contract.balance_of(account).await),
                None => None,
            }
        };
        let (name, symbol, total_supply, paused, balance) = tokio::join!(
            contract.name(),
            contract.symbol(),
            contract.total_supply(),
            contract.paused(),
            balance,
        );

        Self {
            name: loaded("name", name),
            symbol: loaded("symbol", symbol),
            total_supply: loaded("totalSupply", total_supply),
            balance: balance.and_then(|result| loaded("balanceOf", result)),
            paused: loaded("paused", paused),
        }
    }

    pub fn name_text(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn symbol_text(&self) -> &str {
        self.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL)
    }

    /// `"AdwaitToken (ADWT)"`
    pub fn title(&self) -> String {
        format!("{} ({})", self.name_text(), self.symbol_text())
    }

    pub fn supply_text(&self) -> String {
        format!(
            "{} {}",
            to_display_amount(self.total_supply, TOKEN_DECIMALS),
            self.symbol_text()
        )
    }

    pub fn balance_text(&self, connected: bool) -> String {
        if !connected {
            return CONNECT_WALLET.to_string();
        }
        format!(
            "{} {}",
            to_display_amount(self.balance, TOKEN_DECIMALS),
            self.symbol_text()
        )
    }

    /// An unknown pause state reads as active.
    pub fn is_paused(&self) -> bool {
        self.paused == Some(true)
    }

    pub fn status_text(&self) -> &'static str {
        if self.is_paused() {
            "Paused"
        } else {
            "Active"
        }
    }
}

fn loaded<T>(field: &'static str, result: Result<T, ContractError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(field, error = %e, "token read failed");
            None
        }
    }
}

fn spawn_field<C, T, R, Fut>(
    label: &'static str,
    interval: Option<Duration>,
    contract: &Arc<C>,
    state: &Arc<watch::Sender<TokenSnapshot>>,
    fetch: R,
    apply: fn(&mut TokenSnapshot, Option<T>),
) -> PollHandle
where
    C: TokenContract,
    T: Send + 'static,
    R: Fn(Arc<C>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ContractError>> + Send + 'static,
{
    let contract = Arc::clone(contract);
    let state = Arc::clone(state);
    PollHandle::spawn(label, interval, move || {
        let read = fetch(Arc::clone(&contract));
        let state = Arc::clone(&state);
        async move {
            let value = loaded(label, read.await);
            state.send_modify(|snapshot| apply(snapshot, value));
        }
    })
}

/// Token statistics for the dashboard header.
///
/// `name` and `symbol` are read once; supply, pause state and (with an
/// account) balance are refreshed every `interval`.
pub struct StatsView {
    state: watch::Receiver<TokenSnapshot>,
    pollers: Vec<PollHandle>,
}

impl StatsView {
    pub fn mount<C: TokenContract>(
        contract: Arc<C>,
        account: Option<Address>,
        interval: Duration,
    ) -> Self {
        let (tx, state) = watch::channel(TokenSnapshot::default());
        let tx = Arc::new(tx);
        let every = Some(interval);

        let mut pollers = vec![
            spawn_field(
                "name",
                None,
                &contract,
                &tx,
                |c: Arc<C>| async move { c.name().await },
                |s, v| s.name = v,
            ),
            spawn_field(
                "symbol",
                None,
                &contract,
                &tx,
                |c: Arc<C>| async move { c.symbol().await },
                |s, v| s.symbol = v,
            ),
            spawn_field(
                "totalSupply",
                every,
                &contract,
                &tx,
                |c: Arc<C>| async move { c.total_supply().await },
                |s, v| s.total_supply = v,
            ),
            spawn_field(
                "paused",
                every,
                &contract,
                &tx,
                |c: Arc<C>| async move { c.paused().await },
                |s, v| s.paused = v,
            ),
        ];
        if let Some(account) = account {
            pollers.push(spawn_field(
                "balanceOf",
                every,
                &contract,
                &tx,
                move |c: Arc<C>| async move { c.balance_of(account).await },
                |s, v| s.balance = v,
            ));
        }

        Self { state, pollers }
    }

    pub fn snapshot(&self) -> TokenSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TokenSnapshot> {
        self.state.clone()
    }

    /// Number of live pollers (balance is only polled with an account).
    pub fn poller_count(&self) -> usize {
        self.pollers.len()
    }

    /// Aborts every poller; the last published values stay readable.
    pub fn stop(&mut self) {
        self.pollers.clear();
    }
}

async fn read_roles<C: TokenContract>(
    contract: &C,
    account: Address,
) -> (Option<bool>, Option<bool>) {
    let (admin, minter) = tokio::join!(contract.is_admin(account), contract.is_minter(account));
    (loaded("isAdmin", admin), loaded("isMinter", minter))
}

/// Folds a role read into the last published flags. A failed read keeps the
/// previous value, or `false` before anything was loaded.
fn merge_roles(
    previous: Option<RoleFlags>,
    admin: Option<bool>,
    minter: Option<bool>,
) -> RoleFlags {
    let previous = previous.unwrap_or_default();
    RoleFlags {
        is_admin: admin.unwrap_or(previous.is_admin),
        is_minter: minter.unwrap_or(previous.is_minter),
    }
}

/// Reads both role flags; a failed read counts as "not set".
pub async fn fetch_roles<C: TokenContract>(contract: &C, account: Address) -> RoleFlags {
    let (admin, minter) = read_roles(contract, account).await;
    merge_roles(None, admin, minter)
}

/// Role flags of the connected account, refreshed every `interval`.
///
/// Publishes `None` until the first read completes, and forever when no
/// account is connected. A flag whose refresh fails keeps its last value so
/// a flaky node does not unmount panels.
pub struct RoleView {
    state: watch::Receiver<Option<RoleFlags>>,
    poller: Option<PollHandle>,
}

impl RoleView {
    pub fn mount<C: TokenContract>(
        contract: Arc<C>,
        account: Option<Address>,
        interval: Duration,
    ) -> Self {
        let (tx, state) = watch::channel(None);
        let poller = account.map(|account| {
            let tx = Arc::new(tx);
            PollHandle::spawn("roles", Some(interval), move || {
                let contract = Arc::clone(&contract);
                let tx = Arc::clone(&tx);
                async move {
                    let (admin, minter) = read_roles(contract.as_ref(), account).await;
                    tx.send_modify(|flags| *flags = Some(merge_roles(*flags, admin, minter)));
                }
            })
        });

        Self { state, poller }
    }

    pub fn flags(&self) -> Option<RoleFlags> {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<RoleFlags>> {
        self.state.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    pub fn stop(&mut self) {
        self.poller = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn empty_snapshot_uses_placeholders() {
        let snapshot = TokenSnapshot::default();
        assert_eq!(snapshot.title(), "AdwaitToken (ADWT)");
        assert_eq!(snapshot.supply_text(), "0 ADWT");
        assert_eq!(snapshot.balance_text(false), "Connect Wallet");
        assert_eq!(snapshot.balance_text(true), "0 ADWT");
        assert_eq!(snapshot.status_text(), "Active");
    }

    #[test]
    fn loaded_snapshot() {
        let snapshot = TokenSnapshot {
            name: Some("Adwait".into()),
            symbol: Some("ADW".into()),
            total_supply: Some(tokens(1_234_567)),
            balance: Some(tokens(42)),
            paused: Some(true),
        };
        assert_eq!(snapshot.title(), "Adwait (ADW)");
        assert_eq!(snapshot.supply_text(), "1,234,567 ADW");
        assert_eq!(snapshot.balance_text(true), "42 ADW");
        assert!(snapshot.is_paused());
        assert_eq!(snapshot.status_text(), "Paused");
    }

    #[test]
    fn failed_role_read_keeps_previous_flag() {
        let known = Some(RoleFlags {
            is_admin: true,
            is_minter: false,
        });
        let merged = merge_roles(known, None, Some(true));
        assert!(merged.is_admin);
        assert!(merged.is_minter);

        let first = merge_roles(None, None, Some(true));
        assert!(!first.is_admin);
    }

    #[test]
    fn disconnected_hides_balance_even_when_loaded() {
        let snapshot = TokenSnapshot {
            balance: Some(tokens(1)),
            ..Default::default()
        };
        assert_eq!(snapshot.balance_text(false), CONNECT_WALLET);
    }
}
