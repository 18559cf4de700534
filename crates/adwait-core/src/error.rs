//! Classification of remote failures into user-facing messages.
//!
//! The contract and the wallet layer report failures as free-form text. Where
//! the transport exposes structured data (a JSON-RPC error code or a decoded
//! custom revert) that is consulted first; substring matching on the
//! description is the fallback.

use std::fmt;

/// EIP-1193 "user rejected request" code.
pub const USER_REJECTED_CODE: i64 = 4001;

const CANCELLED_SIGNATURES: &[&str] = &["User rejected", "User denied"];
const PAUSED_SIGNATURE: &str = "EnforcedPause";
const UNAUTHORIZED_SIGNATURE: &str = "AccessControlUnauthorizedAccount";
const INSUFFICIENT_BALANCE_SIGNATURE: &str = "ERC20InsufficientBalance";

/// A failure reported by the remote collaborator.
pub trait RemoteFailure: fmt::Display {
    /// JSON-RPC error code, if the transport surfaced one.
    fn rpc_code(&self) -> Option<i64> {
        None
    }

    /// Name of the decoded custom error the contract reverted with.
    fn revert_reason(&self) -> Option<&str> {
        None
    }
}

impl RemoteFailure for str {}

impl RemoteFailure for String {}

/// Error taxonomy shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input caught before submission.
    Validation,
    /// The signer refused the request.
    UserCancelled,
    /// The contract refused because it is paused or the caller lacks a role.
    PolicyRejected,
    /// The caller's balance cannot cover the amount.
    InsufficientFunds,
    /// Anything else.
    Unknown,
}

/// A classified, human-readable failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMessage {
    Cancelled,
    Paused,
    Unauthorized,
    InsufficientBalance,
    /// Unrecognised failure, carrying the raw description.
    Generic(String),
}

impl UserMessage {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cancelled => ErrorKind::UserCancelled,
            Self::Paused | Self::Unauthorized => ErrorKind::PolicyRejected,
            Self::InsufficientBalance => ErrorKind::InsufficientFunds,
            Self::Generic(_) => ErrorKind::Unknown,
        }
    }
}

impl fmt::Display for UserMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("Transaction cancelled by user"),
            Self::Paused => f.write_str("Contract is paused. Only admin can unpause it."),
            Self::Unauthorized => {
                f.write_str("You do not have permission to perform this action")
            }
            Self::InsufficientBalance => f.write_str("Insufficient token balance"),
            Self::Generic(message) => f.write_str(message),
        }
    }
}

/// Map a remote failure to a user-facing message.
///
/// Priority: cancelled > paused > unauthorized > insufficient balance >
/// generic. A cancellation signature wins regardless of other content.
pub fn classify_remote_error<E: RemoteFailure + ?Sized>(error: &E) -> UserMessage {
    let description = error.to_string();
    let revert = error.revert_reason();
    let signals = |signature: &str| revert == Some(signature) || description.contains(signature);

    if error.rpc_code() == Some(USER_REJECTED_CODE)
        || CANCELLED_SIGNATURES.iter().any(|s| description.contains(s))
    {
        UserMessage::Cancelled
    } else if signals(PAUSED_SIGNATURE) {
        UserMessage::Paused
    } else if signals(UNAUTHORIZED_SIGNATURE) {
        UserMessage::Unauthorized
    } else if signals(INSUFFICIENT_BALANCE_SIGNATURE) {
        UserMessage::InsufficientBalance
    } else if description.trim().is_empty() {
        UserMessage::Generic("Transaction failed".to_string())
    } else {
        UserMessage::Generic(description)
    }
}
