//! Role flags and the role-driven panel composition.
//!
//! Which action panels are visible is a pure function of the connected
//! account's role flags, computed once per flag change as a [`PanelSet`].

use serde::{Deserialize, Serialize};

/// Elevated permissions granted by the token contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleFlags {
    pub is_admin: bool,
    pub is_minter: bool,
}

/// The set of privileged panels shown to a connected account.
///
/// The transfer panel and the role explanation are shown for every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSet {
    AdminAndMinter,
    Admin,
    Minter,
    /// Neither role: a neutral placeholder replaces the privileged panels.
    NoSpecialRoles,
}

impl PanelSet {
    /// Derive the visible panels from (possibly not yet loaded) role flags.
    ///
    /// Flags that have not been read yet count as unset.
    pub fn from_roles(flags: Option<RoleFlags>) -> Self {
        let flags = flags.unwrap_or_default();
        match (flags.is_admin, flags.is_minter) {
            (true, true) => Self::AdminAndMinter,
            (true, false) => Self::Admin,
            (false, true) => Self::Minter,
            (false, false) => Self::NoSpecialRoles,
        }
    }

    pub fn shows_admin(self) -> bool {
        matches!(self, Self::AdminAndMinter | Self::Admin)
    }

    pub fn shows_minter(self) -> bool {
        matches!(self, Self::AdminAndMinter | Self::Minter)
    }

    pub fn shows_placeholder(self) -> bool {
        self == Self::NoSpecialRoles
    }

    pub fn shows_transfer(self) -> bool {
        true
    }
}

/// Top-level screen of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// No account connected: only the connect affordance is shown.
    Welcome,
    /// Account connected: statistics plus the given panels.
    Connected(PanelSet),
}

impl Screen {
    pub fn compose(connected: bool, flags: Option<RoleFlags>) -> Self {
        if connected {
            Self::Connected(PanelSet::from_roles(flags))
        } else {
            Self::Welcome
        }
    }

    pub fn panels(self) -> Option<PanelSet> {
        match self {
            Self::Welcome => None,
            Self::Connected(set) => Some(set),
        }
    }
}

/// A role badge shown next to the page title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleBadge {
    pub label: &'static str,
    pub description: &'static str,
}

pub const ADMIN_BADGE: RoleBadge = RoleBadge {
    label: "ADMIN",
    description: "Can pause/unpause & manage roles",
};

pub const MINTER_BADGE: RoleBadge = RoleBadge {
    label: "MINTER",
    description: "Can mint new tokens",
};

/// Badges for the set flags; empty when disconnected or without roles.
pub fn role_badges(flags: Option<RoleFlags>) -> Vec<RoleBadge> {
    let flags = flags.unwrap_or_default();
    let mut badges = Vec::with_capacity(2);
    if flags.is_admin {
        badges.push(ADMIN_BADGE);
    }
    if flags.is_minter {
        badges.push(MINTER_BADGE);
    }
    badges
}

pub const NO_ROLES_TITLE: &str = "No Special Roles";

pub const NO_ROLES_BODY: &str = "You don't have ADMIN or MINTER roles. \
     You can still view token stats and transfer your tokens below.";

/// Static "About Roles" explanation: `(role, capability)`.
pub const ROLE_EXPLANATIONS: [(&str, &str); 3] = [
    (
        "ADMIN",
        "Can pause/unpause the contract and grant/revoke minter roles",
    ),
    (
        "MINTER",
        "Can mint new tokens to any address (when not paused)",
    ),
    ("USER", "Can transfer tokens and view balances"),
];
