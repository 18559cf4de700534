mod common;

use std::sync::Arc;
use std::time::Duration;

use adwait_core::roles::{PanelSet, Screen, ADMIN_BADGE, MINTER_BADGE};
use adwait_dashboard::{Dashboard, Field, Intervals, Notice, Operation, PanelKind, Phase};

use common::{alice, bob, wait_until, ScriptedContract, BOB};

fn intervals() -> Intervals {
    Intervals {
        stats: Duration::from_secs(3),
        roles: Duration::from_secs(5),
    }
}

async fn roles_loaded(dashboard: &Dashboard<ScriptedContract>) {
    let mut rx = dashboard.roles().subscribe();
    wait_until(&mut rx, Option::is_some).await;
}

#[tokio::test(start_paused = true)]
async fn disconnected_shows_welcome_only() {
    let contract = ScriptedContract::shared();
    let mut dashboard = Dashboard::mount(contract, None, intervals(), None);

    assert_eq!(dashboard.screen(), Screen::Welcome);
    assert!(!dashboard.sync_panels());
    assert!(dashboard.mounted().is_empty());
    assert!(dashboard.badges().is_empty());
}

#[tokio::test(start_paused = true)]
async fn no_roles_gets_placeholder_and_transfer() {
    let contract = ScriptedContract::shared();
    let mut dashboard = Dashboard::mount(contract, Some(alice()), intervals(), None);
    roles_loaded(&dashboard).await;
    dashboard.sync_panels();

    assert_eq!(
        dashboard.screen(),
        Screen::Connected(PanelSet::NoSpecialRoles)
    );
    assert!(dashboard.panel_set().is_some_and(PanelSet::shows_placeholder));
    assert_eq!(dashboard.mounted(), vec![PanelKind::Transfer]);
    assert!(dashboard.panel(PanelKind::Admin).is_none());
    assert!(dashboard.panel(PanelKind::Minter).is_none());
    assert!(dashboard.badges().is_empty());
}

#[tokio::test(start_paused = true)]
async fn both_roles_mount_every_panel() {
    let contract = ScriptedContract::shared();
    contract.grant_admin(alice());
    contract.grant_minter(alice());
    let mut dashboard = Dashboard::mount(contract, Some(alice()), intervals(), None);
    roles_loaded(&dashboard).await;

    assert!(dashboard.sync_panels());
    assert_eq!(
        dashboard.mounted(),
        vec![PanelKind::Admin, PanelKind::Minter, PanelKind::Transfer]
    );
    assert_eq!(dashboard.badges(), vec![ADMIN_BADGE, MINTER_BADGE]);
    // Nothing left to change.
    assert!(!dashboard.sync_panels());
}

#[tokio::test(start_paused = true)]
async fn revoked_role_unmounts_panel() {
    let contract = ScriptedContract::shared();
    contract.grant_minter(alice());
    let mut dashboard = Dashboard::mount(Arc::clone(&contract), Some(alice()), intervals(), None);
    roles_loaded(&dashboard).await;
    dashboard.sync_panels();
    assert_eq!(
        dashboard.mounted(),
        vec![PanelKind::Minter, PanelKind::Transfer]
    );

    contract.minters.lock().unwrap().clear();
    let mut rx = dashboard.roles().subscribe();
    wait_until(&mut rx, |f| f.is_some_and(|f| !f.is_minter)).await;

    assert!(dashboard.sync_panels());
    assert_eq!(dashboard.mounted(), vec![PanelKind::Transfer]);
}

#[tokio::test(start_paused = true)]
async fn flaky_role_read_keeps_panel_and_pending_write() {
    let contract = ScriptedContract::shared();
    contract.grant_admin(alice());
    let mut dashboard = Dashboard::mount(Arc::clone(&contract), Some(alice()), intervals(), None);
    roles_loaded(&dashboard).await;
    dashboard.sync_panels();

    let release = contract.hold_next_confirmation();
    let admin = dashboard.panel(PanelKind::Admin).unwrap();
    admin.set_input(Field::RevokeAddress, BOB);
    let mut state = admin.watch();
    let _pending = admin.submit(Operation::Pause).unwrap();
    wait_until(&mut state, |s| {
        matches!(s.phase, Phase::AwaitingConfirmation(..))
    })
    .await;

    contract.fail_read("isAdmin");
    let reads = contract.reads();
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(contract.reads() > reads);
    assert!(dashboard.role_flags().is_some_and(|f| f.is_admin));
    assert!(!dashboard.sync_panels());

    contract.heal_read("isAdmin");
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(!dashboard.sync_panels());

    release.send(()).unwrap();
    let settled = wait_until(&mut state, |s| s.notice.is_some()).await;
    assert!(settled.notice.as_ref().is_some_and(Notice::is_success));

    let admin = dashboard.panel(PanelKind::Admin).unwrap();
    assert_eq!(admin.input(Field::RevokeAddress), BOB);
}

#[tokio::test(start_paused = true)]
async fn reconnect_switches_account() {
    let contract = ScriptedContract::shared();
    contract.grant_admin(bob());
    let mut dashboard = Dashboard::mount(Arc::clone(&contract), Some(alice()), intervals(), None);
    roles_loaded(&dashboard).await;
    dashboard.sync_panels();
    assert_eq!(dashboard.mounted(), vec![PanelKind::Transfer]);

    dashboard.reconnect(Arc::clone(&contract), Some(bob()));
    assert_eq!(dashboard.account(), Some(bob()));
    // Flags of the new account start unloaded.
    assert_eq!(dashboard.role_flags(), None);

    roles_loaded(&dashboard).await;
    dashboard.sync_panels();
    assert_eq!(
        dashboard.mounted(),
        vec![PanelKind::Admin, PanelKind::Transfer]
    );

    dashboard.reconnect(contract, None);
    assert_eq!(dashboard.screen(), Screen::Welcome);
    assert!(dashboard.mounted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn snapshot_loads_for_disconnected_visitor() {
    let contract = ScriptedContract::shared();
    let dashboard = Dashboard::mount(contract, None, intervals(), None);
    let mut rx = dashboard.stats().subscribe();
    let snapshot = wait_until(&mut rx, |s| s.name.is_some()).await;

    assert_eq!(snapshot.name_text(), "AdwaitToken");
    assert_eq!(dashboard.snapshot().balance_text(dashboard.is_connected()), "Connect Wallet");
}
