//! Action panels and the transaction lifecycle.
//!
//! A panel owns a handful of input fields and the operations that read them.
//! Submitting an operation validates its inputs locally, then drives one
//! write call through signing, broadcast and confirmation on a spawned task:
//!
//! ```text
//! Idle -> Submitting -> AwaitingConfirmation -> Settled -> Idle
//!              \_______________________________/
//!                  rejection, revert, timeout
//! ```
//!
//! Each transition is published on a broadcast channel; the panel's current
//! state (phase, inputs, notice) is published through a `watch` channel.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use serde_json::{json, Map, Value};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use adwait_core::error::{classify_remote_error, UserMessage};
use adwait_core::format::{is_well_formed_address, to_raw_amount, TOKEN_DECIMALS};
use adwait_core::journal::{JournalEntry, SharedJournal};
use adwait_evm::{Address, TokenContract, TxHash, U256, WriteCall};

const TRANSITION_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelKind {
    Admin,
    Minter,
    Transfer,
}

impl PanelKind {
    pub const ALL: [PanelKind; 3] = [Self::Admin, Self::Minter, Self::Transfer];

    pub fn title(self) -> &'static str {
        match self {
            Self::Admin => "Admin Controls",
            Self::Minter => "Minter Controls",
            Self::Transfer => "Transfer Tokens",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Admin => "Manage contract state and roles",
            Self::Minter => "Mint new tokens to any address",
            Self::Transfer => "Send tokens to another address",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::Admin => "Transaction confirmed!",
            Self::Minter => "Tokens minted successfully!",
            Self::Transfer => "Transfer completed successfully!",
        }
    }

    pub fn operations(self) -> &'static [Operation] {
        match self {
            Self::Admin => &[
                Operation::Pause,
                Operation::Unpause,
                Operation::GrantMinter,
                Operation::RevokeMinter,
            ],
            Self::Minter => &[Operation::Mint],
            Self::Transfer => &[Operation::Transfer],
        }
    }

    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::Admin => &[Field::GrantAddress, Field::RevokeAddress],
            Self::Minter | Self::Transfer => &[Field::Recipient, Field::Amount],
        }
    }

    pub fn placeholder(self, field: Field) -> &'static str {
        match (self, field) {
            (_, Field::GrantAddress) => "0x... (Address to grant minter role)",
            (_, Field::RevokeAddress) => "0x... (Address to revoke minter role)",
            (Self::Transfer, Field::Recipient) => "0x... (Address to send tokens to)",
            (_, Field::Recipient) => "0x... (Address to receive tokens)",
            (Self::Transfer, Field::Amount) => "10",
            (_, Field::Amount) => "100",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Pause,
    Unpause,
    GrantMinter,
    RevokeMinter,
    Mint,
    Transfer,
}

impl Operation {
    pub fn panel(self) -> PanelKind {
        match self {
            Self::Pause | Self::Unpause | Self::GrantMinter | Self::RevokeMinter => {
                PanelKind::Admin
            }
            Self::Mint => PanelKind::Minter,
            Self::Transfer => PanelKind::Transfer,
        }
    }

    /// Inputs read by this operation, and cleared after it succeeds.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::Pause | Self::Unpause => &[],
            Self::GrantMinter => &[Field::GrantAddress],
            Self::RevokeMinter => &[Field::RevokeAddress],
            Self::Mint | Self::Transfer => &[Field::Recipient, Field::Amount],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pause => "Pause Contract",
            Self::Unpause => "Unpause Contract",
            Self::GrantMinter => "Grant Minter Role",
            Self::RevokeMinter => "Revoke Minter Role",
            Self::Mint => "Mint Tokens",
            Self::Transfer => "Transfer Tokens",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    GrantAddress,
    RevokeAddress,
    Recipient,
    Amount,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::GrantAddress => "Grant Minter Role",
            Self::RevokeAddress => "Revoke Minter Role",
            Self::Recipient => "Recipient Address",
            Self::Amount => "Amount (in tokens)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(TxHash),
    Failure(UserMessage),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting for the wallet to sign and the node to accept.
    Submitting(Operation),
    AwaitingConfirmation(Operation, TxHash),
    Settled(Operation, Outcome),
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting(_) | Self::AwaitingConfirmation(..))
    }

    /// The operation in flight, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Submitting(op) | Self::AwaitingConfirmation(op, _) => Some(*op),
            Self::Idle | Self::Settled(..) => None,
        }
    }

    /// Button text while busy.
    pub fn progress_text(&self) -> Option<&'static str> {
        match self {
            Self::Submitting(_) => Some("Awaiting Confirmation..."),
            Self::AwaitingConfirmation(..) => Some("Confirming Transaction..."),
            Self::Idle | Self::Settled(..) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid Ethereum address")]
    InvalidAddress,
    #[error("Please enter a valid amount")]
    InvalidAmount,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("an operation is already in flight on this panel")]
    Busy,
    #[error("{op:?} is not available on the {panel} panel")]
    WrongPanel { op: Operation, panel: PanelKind },
}

/// Inline, dismissible message shown under a panel's title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Validation(ValidationError),
    Success { message: &'static str, tx: TxHash },
    Failure(UserMessage),
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "{e}"),
            Self::Success { message, .. } => write!(f, "✅ {message}"),
            Self::Failure(message) => write!(f, "❌ {message}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    pub phase: Phase,
    pub inputs: BTreeMap<Field, String>,
    pub notice: Option<Notice>,
}

impl PanelState {
    pub fn input(&self, field: Field) -> &str {
        self.inputs.get(&field).map(String::as_str).unwrap_or("")
    }
}

fn address_input(state: &PanelState, field: Field) -> Result<Address, ValidationError> {
    let raw = state.input(field).trim();
    if !is_well_formed_address(raw) {
        return Err(ValidationError::InvalidAddress);
    }
    raw.parse().map_err(|_| ValidationError::InvalidAddress)
}

fn amount_input(state: &PanelState) -> Result<U256, ValidationError> {
    match to_raw_amount(state.input(Field::Amount), TOKEN_DECIMALS) {
        Ok(amount) if !amount.is_zero() => Ok(amount),
        _ => Err(ValidationError::InvalidAmount),
    }
}

/// Builds the write call for `op` from the panel's inputs.
///
/// Addresses are checked before amounts.
pub fn validate(op: Operation, state: &PanelState) -> Result<WriteCall, ValidationError> {
    Ok(match op {
        Operation::Pause => WriteCall::Pause,
        Operation::Unpause => WriteCall::Unpause,
        Operation::GrantMinter => WriteCall::GrantMinterRole(address_input(state, Field::GrantAddress)?),
        Operation::RevokeMinter => {
            WriteCall::RevokeMinterRole(address_input(state, Field::RevokeAddress)?)
        }
        Operation::Mint => {
            let to = address_input(state, Field::Recipient)?;
            WriteCall::Mint {
                to,
                amount: amount_input(state)?,
            }
        }
        Operation::Transfer => {
            let to = address_input(state, Field::Recipient)?;
            WriteCall::Transfer {
                to,
                amount: amount_input(state)?,
            }
        }
    })
}

struct Shared {
    state: watch::Sender<PanelState>,
    transitions: broadcast::Sender<Phase>,
}

impl Shared {
    fn publish(&self, phase: Phase) {
        // No subscribers is fine.
        let _ = self.transitions.send(phase);
    }
}

/// One mounted action panel.
///
/// Dropping the panel does not cancel an in-flight write; the task finishes
/// but no longer updates any state.
pub struct ActionPanel<C> {
    kind: PanelKind,
    contract: Arc<C>,
    shared: Arc<Shared>,
    journal: Option<SharedJournal>,
}

impl<C> fmt::Debug for ActionPanel<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionPanel")
            .field("kind", &self.kind)
            .field("state", &*self.shared.state.borrow())
            .finish()
    }
}

impl<C: TokenContract> ActionPanel<C> {
    pub fn new(kind: PanelKind, contract: Arc<C>) -> Self {
        let (state, _) = watch::channel(PanelState::default());
        let (transitions, _) = broadcast::channel(TRANSITION_CAPACITY);
        Self {
            kind,
            contract,
            shared: Arc::new(Shared { state, transitions }),
            journal: None,
        }
    }

    /// Record every settled action in `journal`.
    pub fn with_journal(mut self, journal: SharedJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn state(&self) -> PanelState {
        self.shared.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<PanelState> {
        self.shared.state.subscribe()
    }

    /// Phase transitions from now on, including `Settled`.
    pub fn transitions(&self) -> broadcast::Receiver<Phase> {
        self.shared.transitions.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.shared.state.borrow().phase.is_busy()
    }

    pub fn input(&self, field: Field) -> String {
        self.shared.state.borrow().input(field).to_string()
    }

    /// Sets a field; fields that belong to another panel are ignored.
    pub fn set_input(&self, field: Field, value: impl Into<String>) -> bool {
        if !self.kind.fields().contains(&field) {
            return false;
        }
        let value = value.into();
        self.shared.state.send_modify(|state| {
            state.inputs.insert(field, value);
        });
        true
    }

    pub fn dismiss_notice(&self) {
        self.shared.state.send_if_modified(|state| state.notice.take().is_some());
    }

    /// Validates and starts `op`.
    ///
    /// On a validation failure the panel stays idle with an inline notice and
    /// nothing is sent. Otherwise exactly one write call is issued on a
    /// spawned task whose handle resolves to the outcome.
    pub fn submit(&self, op: Operation) -> Result<JoinHandle<Outcome>, SubmitError> {
        if op.panel() != self.kind {
            return Err(SubmitError::WrongPanel {
                op,
                panel: self.kind,
            });
        }

        let mut accepted = Err(SubmitError::Busy);
        self.shared.state.send_if_modified(|state| {
            if state.phase.is_busy() {
                return false;
            }
            accepted = match validate(op, state) {
                Ok(call) => {
                    state.phase = Phase::Submitting(op);
                    state.notice = None;
                    Ok(call)
                }
                Err(e) => {
                    state.notice = Some(Notice::Validation(e.clone()));
                    Err(SubmitError::Invalid(e))
                }
            };
            true
        });
        let call = accepted?;
        self.shared.publish(Phase::Submitting(op));

        let task = Drive {
            kind: self.kind,
            op,
            shared: Arc::downgrade(&self.shared),
            journal: self.journal.clone(),
        };
        Ok(tokio::spawn(task.run(Arc::clone(&self.contract), call)))
    }
}

/// The spawned half of a submission.
struct Drive {
    kind: PanelKind,
    op: Operation,
    shared: Weak<Shared>,
    journal: Option<SharedJournal>,
}

impl Drive {
    async fn run<C: TokenContract>(self, contract: Arc<C>, call: WriteCall) -> Outcome {
        let function = call.function_name();
        let mut details = call_details(&call);
        info!(function, "submitting transaction");

        let mut tx_hash = None;
        let result = match contract.submit(call).await {
            Ok(tx) => {
                tx_hash = Some(tx);
                self.awaiting(tx);
                contract.confirm(tx).await.map(|()| tx)
            }
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(tx) => {
                info!(function, %tx, "transaction confirmed");
                Outcome::Success(tx)
            }
            Err(e) => {
                warn!(function, error = %e, "transaction failed");
                Outcome::Failure(classify_remote_error(&e))
            }
        };

        if let Some(tx) = tx_hash {
            details.insert("tx_hash".into(), Value::String(tx.to_string()));
        }
        self.record(function, details, &outcome);
        self.settle(&outcome);
        outcome
    }

    fn awaiting(&self, tx: TxHash) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let phase = Phase::AwaitingConfirmation(self.op, tx);
        shared.state.send_modify(|state| state.phase = phase.clone());
        shared.publish(phase);
    }

    fn settle(&self, outcome: &Outcome) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        shared.state.send_modify(|state| {
            state.phase = Phase::Idle;
            state.notice = Some(match outcome {
                Outcome::Success(tx) => {
                    for field in self.op.fields() {
                        state.inputs.remove(field);
                    }
                    Notice::Success {
                        message: self.kind.success_message(),
                        tx: *tx,
                    }
                }
                Outcome::Failure(message) => Notice::Failure(message.clone()),
            });
        });
        shared.publish(Phase::Settled(self.op, outcome.clone()));
        shared.publish(Phase::Idle);
    }

    fn record(&self, function: &str, details: Map<String, Value>, outcome: &Outcome) {
        let Some(journal) = &self.journal else {
            return;
        };
        let outcome = match outcome {
            Outcome::Success(_) => "confirmed".to_string(),
            Outcome::Failure(message) => format!("failed: {message}"),
        };
        let entry = JournalEntry::new(function, Value::Object(details), outcome);
        match journal.lock() {
            Ok(mut journal) => {
                if let Err(e) = journal.record(&entry) {
                    warn!(error = %e, "failed to journal action");
                }
            }
            Err(_) => warn!(function, "journal lock poisoned; action not recorded"),
        }
    }
}

fn call_details(call: &WriteCall) -> Map<String, Value> {
    let details = match call {
        WriteCall::Pause | WriteCall::Unpause => json!({}),
        WriteCall::GrantMinterRole(account) | WriteCall::RevokeMinterRole(account) => {
            json!({ "account": account.to_string() })
        }
        WriteCall::Mint { to, amount } | WriteCall::Transfer { to, amount } => {
            json!({ "to": to.to_string(), "amount": amount.to_string() })
        }
    };
    match details {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn state(inputs: &[(Field, &str)]) -> PanelState {
        PanelState {
            inputs: inputs
                .iter()
                .map(|(field, value)| (*field, value.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn pause_needs_no_input() {
        assert_eq!(validate(Operation::Pause, &state(&[])), Ok(WriteCall::Pause));
        assert_eq!(validate(Operation::Unpause, &state(&[])), Ok(WriteCall::Unpause));
    }

    #[test]
    fn grant_requires_address() {
        assert_eq!(
            validate(Operation::GrantMinter, &state(&[])),
            Err(ValidationError::InvalidAddress)
        );
        let call = validate(
            Operation::GrantMinter,
            &state(&[(Field::GrantAddress, ADDRESS)]),
        )
        .unwrap();
        assert_eq!(call, WriteCall::GrantMinterRole(ADDRESS.parse().unwrap()));
    }

    #[test]
    fn revoke_reads_its_own_field() {
        let inputs = state(&[(Field::GrantAddress, ADDRESS)]);
        assert_eq!(
            validate(Operation::RevokeMinter, &inputs),
            Err(ValidationError::InvalidAddress)
        );
    }

    #[test]
    fn address_checked_before_amount() {
        let inputs = state(&[(Field::Recipient, "0x1234"), (Field::Amount, "abc")]);
        assert_eq!(
            validate(Operation::Mint, &inputs),
            Err(ValidationError::InvalidAddress)
        );
    }

    #[test]
    fn amount_must_be_positive() {
        for bad in ["", "0", "0.0", "-1", "abc", "1.2.3"] {
            let inputs = state(&[(Field::Recipient, ADDRESS), (Field::Amount, bad)]);
            assert_eq!(
                validate(Operation::Transfer, &inputs),
                Err(ValidationError::InvalidAmount),
                "{bad}"
            );
        }
    }

    #[test]
    fn mint_builds_raw_amount() {
        let inputs = state(&[(Field::Recipient, ADDRESS), (Field::Amount, " 1.5 ")]);
        let call = validate(Operation::Mint, &inputs).unwrap();
        assert_eq!(
            call,
            WriteCall::Mint {
                to: ADDRESS.parse().unwrap(),
                amount: U256::from(1_500_000_000_000_000_000u64),
            }
        );
    }

    #[test]
    fn operations_belong_to_their_panel() {
        for kind in PanelKind::ALL {
            for op in kind.operations() {
                assert_eq!(op.panel(), kind);
                for field in op.fields() {
                    assert!(kind.fields().contains(field));
                }
            }
        }
    }

    #[test]
    fn progress_text() {
        assert_eq!(Phase::Idle.progress_text(), None);
        assert_eq!(
            Phase::Submitting(Operation::Mint).progress_text(),
            Some("Awaiting Confirmation...")
        );
        assert_eq!(
            Phase::AwaitingConfirmation(Operation::Mint, TxHash::ZERO).progress_text(),
            Some("Confirming Transaction...")
        );
    }

    #[test]
    fn notice_text() {
        let success = Notice::Success {
            message: PanelKind::Minter.success_message(),
            tx: TxHash::ZERO,
        };
        assert_eq!(success.to_string(), "✅ Tokens minted successfully!");
        assert_eq!(
            Notice::Validation(ValidationError::InvalidAmount).to_string(),
            "Please enter a valid amount"
        );
        assert_eq!(
            Notice::Failure(UserMessage::Paused).to_string(),
            "❌ Contract is paused. Only admin can unpause it."
        );
    }

    #[test]
    fn details_carry_arguments() {
        let call = WriteCall::Transfer {
            to: ADDRESS.parse().unwrap(),
            amount: U256::from(7u64),
        };
        let details = call_details(&call);
        assert_eq!(details["amount"], "7");
        assert!(details["to"]
            .as_str()
            .unwrap()
            .eq_ignore_ascii_case(ADDRESS));
        assert!(call_details(&WriteCall::Pause).is_empty());
    }
}
