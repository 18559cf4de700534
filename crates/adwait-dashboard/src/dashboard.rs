//! Composition root.
//!
//! Owns the connected account, both read views and whichever action panels
//! the account's roles call for.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use adwait_core::config::PollingConfig;
use adwait_core::journal::SharedJournal;
use adwait_core::roles::{role_badges, PanelSet, RoleBadge, RoleFlags, Screen};
use adwait_evm::{Address, TokenContract};

use crate::panel::{ActionPanel, PanelKind};
use crate::view::{RoleView, StatsView, TokenSnapshot};

/// Refresh intervals of the read views.
#[derive(Debug, Clone, Copy)]
pub struct Intervals {
    pub stats: Duration,
    pub roles: Duration,
}

impl Default for Intervals {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for Intervals {
    fn from(config: &PollingConfig) -> Self {
        Self {
            stats: config.stats_interval(),
            roles: config.roles_interval(),
        }
    }
}

struct Panels<C> {
    admin: Option<ActionPanel<C>>,
    minter: Option<ActionPanel<C>>,
    transfer: Option<ActionPanel<C>>,
}

impl<C> Default for Panels<C> {
    fn default() -> Self {
        Self {
            admin: None,
            minter: None,
            transfer: None,
        }
    }
}

impl<C> Panels<C> {
    fn slot(&mut self, kind: PanelKind) -> &mut Option<ActionPanel<C>> {
        match kind {
            PanelKind::Admin => &mut self.admin,
            PanelKind::Minter => &mut self.minter,
            PanelKind::Transfer => &mut self.transfer,
        }
    }

    fn get(&self, kind: PanelKind) -> Option<&ActionPanel<C>> {
        match kind {
            PanelKind::Admin => self.admin.as_ref(),
            PanelKind::Minter => self.minter.as_ref(),
            PanelKind::Transfer => self.transfer.as_ref(),
        }
    }
}

pub struct Dashboard<C> {
    contract: Arc<C>,
    account: Option<Address>,
    intervals: Intervals,
    journal: Option<SharedJournal>,
    stats: StatsView,
    roles: RoleView,
    panels: Panels<C>,
}

impl<C: TokenContract> Dashboard<C> {
    /// Mounts the views for `account` and the panels its (not yet loaded)
    /// roles allow.
    pub fn mount(
        contract: Arc<C>,
        account: Option<Address>,
        intervals: Intervals,
        journal: Option<SharedJournal>,
    ) -> Self {
        let stats = StatsView::mount(Arc::clone(&contract), account, intervals.stats);
        let roles = RoleView::mount(Arc::clone(&contract), account, intervals.roles);
        let mut dashboard = Self {
            contract,
            account,
            intervals,
            journal,
            stats,
            roles,
            panels: Panels::default(),
        };
        dashboard.sync_panels();
        dashboard
    }

    /// Switches to a new contract handle and account.
    ///
    /// Pollers and panels of the previous account are dropped before the new
    /// ones are mounted.
    pub fn reconnect(&mut self, contract: Arc<C>, account: Option<Address>) {
        info!(?account, "switching account");
        self.stats.stop();
        self.roles.stop();
        self.panels = Panels::default();

        self.contract = contract;
        self.account = account;
        self.stats = StatsView::mount(Arc::clone(&self.contract), account, self.intervals.stats);
        self.roles = RoleView::mount(Arc::clone(&self.contract), account, self.intervals.roles);
        self.sync_panels();
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn contract(&self) -> &Arc<C> {
        &self.contract
    }

    pub fn screen(&self) -> Screen {
        Screen::compose(self.is_connected(), self.roles.flags())
    }

    /// Mounts and unmounts panels to match the current role flags.
    ///
    /// Returns true when anything changed. Unmounting a busy panel lets its
    /// write finish in the background.
    pub fn sync_panels(&mut self) -> bool {
        let set = self.screen().panels();
        let wanted = |kind: PanelKind| match (set, kind) {
            (None, _) => false,
            (Some(set), PanelKind::Admin) => set.shows_admin(),
            (Some(set), PanelKind::Minter) => set.shows_minter(),
            (Some(set), PanelKind::Transfer) => set.shows_transfer(),
        };

        let mut changed = false;
        for kind in PanelKind::ALL {
            let want = wanted(kind);
            let contract = &self.contract;
            let journal = &self.journal;
            let slot = self.panels.slot(kind);
            match (want, slot.is_some()) {
                (true, false) => {
                    debug!(panel = ?kind, "mounting panel");
                    let panel = ActionPanel::new(kind, Arc::clone(contract));
                    *slot = Some(match journal {
                        Some(journal) => panel.with_journal(Arc::clone(journal)),
                        None => panel,
                    });
                    changed = true;
                }
                (false, true) => {
                    debug!(panel = ?kind, "unmounting panel");
                    *slot = None;
                    changed = true;
                }
                _ => {}
            }
        }
        changed
    }

    pub fn panel(&self, kind: PanelKind) -> Option<&ActionPanel<C>> {
        self.panels.get(kind)
    }

    /// Kinds of the currently mounted panels.
    pub fn mounted(&self) -> Vec<PanelKind> {
        PanelKind::ALL
            .into_iter()
            .filter(|kind| self.panels.get(*kind).is_some())
            .collect()
    }

    pub fn panel_set(&self) -> Option<PanelSet> {
        self.screen().panels()
    }

    pub fn snapshot(&self) -> TokenSnapshot {
        self.stats.snapshot()
    }

    pub fn stats(&self) -> &StatsView {
        &self.stats
    }

    pub fn roles(&self) -> &RoleView {
        &self.roles
    }

    pub fn role_flags(&self) -> Option<RoleFlags> {
        self.roles.flags()
    }

    pub fn badges(&self) -> Vec<RoleBadge> {
        if self.is_connected() {
            role_badges(self.role_flags())
        } else {
            Vec::new()
        }
    }
}
