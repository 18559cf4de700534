//! # adwait CLI
//!
//! Entry point for the `adwait` binary.
//!
//! Subcommands:
//! - `adwait dashboard` — interactive terminal dashboard
//! - `adwait stats` / `adwait roles` — one-shot reads
//! - `adwait pause|unpause|grant-minter|revoke-minter|mint|transfer` — one-shot writes

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use adwait_dashboard::{Field, Operation};
use adwait_evm::Address;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod tui;

use commands::write::WriteRequest;

/// adwait — dashboard for the AdwaitToken ERC-20 contract.
#[derive(Parser)]
#[command(name = "adwait", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArg {
    /// Path to config.yaml (default: ~/.adwait/config.yaml).
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct WalletArg {
    /// Encrypted V3 keystore to sign with (overrides keystore_path).
    /// ADWAIT_PRIVATE_KEY takes precedence when set.
    #[arg(long)]
    keystore: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard.
    Dashboard {
        #[command(flatten)]
        config: ConfigArg,
        #[command(flatten)]
        wallet: WalletArg,
    },

    /// Show token name, supply, pause state and optionally a balance.
    Stats {
        #[command(flatten)]
        config: ConfigArg,
        /// Account whose balance to show.
        #[arg(long, value_parser = parse_account)]
        account: Option<Address>,
    },

    /// Show the ADMIN / MINTER roles of an account.
    Roles {
        #[command(flatten)]
        config: ConfigArg,
        #[arg(long, value_parser = parse_account)]
        account: Address,
    },

    /// Pause the contract (ADMIN).
    Pause {
        #[command(flatten)]
        config: ConfigArg,
        #[command(flatten)]
        wallet: WalletArg,
    },

    /// Unpause the contract (ADMIN).
    Unpause {
        #[command(flatten)]
        config: ConfigArg,
        #[command(flatten)]
        wallet: WalletArg,
    },

    /// Grant the minter role to an account (ADMIN).
    GrantMinter {
        #[command(flatten)]
        config: ConfigArg,
        #[command(flatten)]
        wallet: WalletArg,
        /// Account to grant the role to (0x...).
        #[arg(long)]
        account: String,
    },

    /// Revoke the minter role from an account (ADMIN).
    RevokeMinter {
        #[command(flatten)]
        config: ConfigArg,
        #[command(flatten)]
        wallet: WalletArg,
        /// Account to revoke the role from (0x...).
        #[arg(long)]
        account: String,
    },

    /// Mint new tokens (MINTER).
    Mint {
        #[command(flatten)]
        config: ConfigArg,
        #[command(flatten)]
        wallet: WalletArg,
        /// Recipient address (0x...).
        #[arg(long)]
        to: String,
        /// Amount in whole tokens, up to 18 decimals (e.g. "100" or "0.5").
        #[arg(long)]
        amount: String,
    },

    /// Transfer tokens from the connected account.
    Transfer {
        #[command(flatten)]
        config: ConfigArg,
        #[command(flatten)]
        wallet: WalletArg,
        /// Recipient address (0x...).
        #[arg(long)]
        to: String,
        /// Amount in whole tokens, up to 18 decimals.
        #[arg(long)]
        amount: String,
    },
}

fn parse_account(s: &str) -> Result<Address, String> {
    let s = s.trim();
    if !adwait_core::format::is_well_formed_address(s) {
        return Err("expected 0x followed by 40 hex characters with a valid checksum".into());
    }
    s.parse().map_err(|e| format!("{e}"))
}

/// The dashboard owns the terminal, so its logs go to a file.
fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(command, Commands::Dashboard { .. }) {
        init_logging(Some(&commands::resolve_data_dir(None)?.join("adwait.log")))?;
    } else {
        init_logging(None)?;
    }

    let write = |op: Operation, inputs: Vec<(Field, String)>| WriteRequest { op, inputs };

    match command {
        Commands::Dashboard { config, wallet } => {
            commands::dashboard::run(config.config, wallet.keystore).await
        }
        Commands::Stats { config, account } => commands::read::stats(config.config, account).await,
        Commands::Roles { config, account } => commands::read::roles(config.config, account).await,
        Commands::Pause { config, wallet } => {
            commands::write::run(config.config, wallet.keystore, write(Operation::Pause, vec![]))
                .await
        }
        Commands::Unpause { config, wallet } => {
            commands::write::run(config.config, wallet.keystore, write(Operation::Unpause, vec![]))
                .await
        }
        Commands::GrantMinter {
            config,
            wallet,
            account,
        } => {
            let request = write(Operation::GrantMinter, vec![(Field::GrantAddress, account)]);
            commands::write::run(config.config, wallet.keystore, request).await
        }
        Commands::RevokeMinter {
            config,
            wallet,
            account,
        } => {
            let request = write(Operation::RevokeMinter, vec![(Field::RevokeAddress, account)]);
            commands::write::run(config.config, wallet.keystore, request).await
        }
        Commands::Mint {
            config,
            wallet,
            to,
            amount,
        } => {
            let request = write(
                Operation::Mint,
                vec![(Field::Recipient, to), (Field::Amount, amount)],
            );
            commands::write::run(config.config, wallet.keystore, request).await
        }
        Commands::Transfer {
            config,
            wallet,
            to,
            amount,
        } => {
            let request = write(
                Operation::Transfer,
                vec![(Field::Recipient, to), (Field::Amount, amount)],
            );
            commands::write::run(config.config, wallet.keystore, request).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
