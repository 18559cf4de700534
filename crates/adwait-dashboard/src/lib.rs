//! # adwait-dashboard
//!
//! The live parts of the dashboard, independent of any terminal:
//!
//! - [`poll`] — scoped polling tasks
//! - [`view`] — token statistics and role flags, published via `watch`
//! - [`panel`] — action panels driving writes through their lifecycle
//! - [`dashboard`] — composition root tying views and panels to an account

pub mod dashboard;
pub mod panel;
pub mod poll;
pub mod view;

pub use dashboard::{Dashboard, Intervals};
pub use panel::{
    ActionPanel, Field, Notice, Operation, Outcome, PanelKind, PanelState, Phase, SubmitError,
    ValidationError,
};
pub use view::{RoleView, StatsView, TokenSnapshot};
