//! `adwait dashboard` — mount the live dashboard and hand it to the TUI.

use std::path::PathBuf;
use std::sync::Arc;

use adwait_dashboard::{Dashboard, Intervals};

use super::{CliResult, Session, WalletSource};
use crate::tui::{self, App};

pub async fn run(config: Option<PathBuf>, keystore: Option<PathBuf>) -> CliResult {
    let session = Session::load(config)?;
    let journal = session.journal()?;
    let wallet = WalletSource::resolve(keystore, &session.config);
    tracing::info!(
        contract = %session.binding,
        rpc_url = %session.config.rpc_url,
        wallet = wallet.is_some(),
        "starting dashboard"
    );

    // Visitors start disconnected; the wallet is unlocked on demand.
    let contract = Arc::new(session.read_only()?);
    let dashboard = Dashboard::mount(
        contract,
        None,
        Intervals::from(&session.config.polling),
        journal,
    );

    let mut app = App::new(session, wallet, dashboard);
    tokio::task::block_in_place(|| tui::run(&mut app))
}
