//! `adwait stats` / `adwait roles` — one-shot reads.

use std::path::PathBuf;

use adwait_core::format::shorten_identifier;
use adwait_core::roles::{role_badges, NO_ROLES_BODY, NO_ROLES_TITLE};
use adwait_dashboard::view::fetch_roles;
use adwait_dashboard::TokenSnapshot;
use adwait_evm::Address;

use super::{CliResult, Session};

pub async fn stats(config: Option<PathBuf>, account: Option<Address>) -> CliResult {
    let session = Session::load(config)?;
    let adapter = session.read_only()?;
    let snapshot = TokenSnapshot::fetch(&adapter, account).await;

    println!();
    println!("=== {} ===", snapshot.title());
    println!("  Contract:      {}", session.binding);
    println!("  Status:        {}", snapshot.status_text());
    println!("  Total Supply:  {}", snapshot.supply_text());
    if let Some(account) = account {
        println!(
            "  Balance:       {} ({})",
            snapshot.balance_text(true),
            shorten_identifier(&account.to_string(), 4)
        );
    }
    Ok(())
}

pub async fn roles(config: Option<PathBuf>, account: Address) -> CliResult {
    let session = Session::load(config)?;
    let adapter = session.read_only()?;
    let badges = role_badges(Some(fetch_roles(&adapter, account).await));

    println!("Roles for {account}:");
    if badges.is_empty() {
        println!("  {NO_ROLES_TITLE}: {NO_ROLES_BODY}");
    }
    for badge in badges {
        println!("  [{}] {}", badge.label, badge.description);
    }
    Ok(())
}
