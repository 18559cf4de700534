//! # adwait-core
//!
//! Chain-agnostic building blocks of the adwait dashboard: amount formatting,
//! remote error classification, role-driven panel composition, configuration
//! and the action journal.

pub mod config;
pub mod error;
pub mod format;
pub mod journal;
pub mod roles;

pub use error::{classify_remote_error, ErrorKind, RemoteFailure, UserMessage};
pub use format::{shorten_identifier, to_display_amount, to_raw_amount, ParseError, TOKEN_DECIMALS};
pub use roles::{PanelSet, RoleFlags, Screen};
