//! # adwait
//!
//! Terminal dashboard for the AdwaitToken ERC-20 contract: live token
//! statistics, role-gated admin and minter controls, and token transfers.
//!
//! This crate re-exports the workspace libraries under one name:
//!
//! - [`common`] — formatting, error classification, roles, config, journal
//! - [`evm`] — contract binding and JSON-RPC adapter
//! - [`dashboard`] — polling views and action panels

pub use adwait_core as common;
pub use adwait_dashboard as dashboard;
pub use adwait_evm as evm;

pub use adwait_dashboard::{ActionPanel, Dashboard, Intervals, PanelKind};
pub use adwait_evm::{EvmAdapter, TokenContract};

/// Returns the library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
