//! `adwait pause|unpause|grant-minter|revoke-minter|mint|transfer`.
//!
//! Drives a single action panel from the command line, so validation,
//! error classification and journaling behave exactly as in the dashboard.

use std::path::PathBuf;

use adwait_dashboard::panel::validate;
use adwait_dashboard::{ActionPanel, Field, Operation, Outcome, PanelState, Phase, ValidationError};
use adwait_evm::WriteCall;
use tokio::sync::broadcast::error::RecvError;

use super::{connect, prompt_password, CliResult, Session, WalletSource};

/// One write and the field values it needs.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub op: Operation,
    pub inputs: Vec<(Field, String)>,
}

impl WriteRequest {
    /// Checks the inputs the same way the panel will, without any wallet.
    pub fn check(&self) -> Result<WriteCall, ValidationError> {
        let state = PanelState {
            inputs: self.inputs.iter().cloned().collect(),
            ..Default::default()
        };
        validate(self.op, &state)
    }
}

pub async fn run(
    config: Option<PathBuf>,
    keystore: Option<PathBuf>,
    request: WriteRequest,
) -> CliResult {
    request.check()?;
    let session = Session::load(config)?;
    let source = WalletSource::resolve(keystore, &session.config).ok_or(
        "no wallet configured: pass --keystore, set keystore_path in config.yaml, or set ADWAIT_PRIVATE_KEY",
    )?;
    let password = if source.needs_password() {
        Some(prompt_password()?)
    } else {
        None
    };
    let adapter = connect(&session, &source, password.as_deref()).await?;
    let account = adapter.account().ok_or("wallet has no account")?;

    let kind = request.op.panel();
    let panel = ActionPanel::new(kind, adapter);
    let panel = match session.journal()? {
        Some(journal) => panel.with_journal(journal),
        None => panel,
    };

    println!("\n=== {} ===", request.op.label());
    println!("  From:      {account}");
    println!("  Contract:  {}", session.binding);
    for (field, value) in &request.inputs {
        println!("  {:<20} {value}", format!("{}:", field.label()));
        panel.set_input(*field, value.as_str());
    }
    println!();

    let mut transitions = panel.transitions();
    let handle = panel.submit(request.op)?;

    loop {
        match transitions.recv().await {
            Ok(Phase::Settled(..) | Phase::Idle) | Err(RecvError::Closed) => break,
            Ok(phase) => {
                if let Phase::AwaitingConfirmation(_, tx) = &phase {
                    println!("📨 Transaction sent: {tx}");
                }
                if let Some(text) = phase.progress_text() {
                    println!("⏳ {text}");
                }
            }
            Err(RecvError::Lagged(_)) => continue,
        }
    }

    match handle.await? {
        Outcome::Success(tx) => {
            println!("✅ {}", kind.success_message());
            println!("   Tx hash: {tx}");
            Ok(())
        }
        Outcome::Failure(message) => Err(message.to_string().into()),
    }
}
