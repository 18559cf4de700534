//! Scripted in-memory token contract for view and panel tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use adwait_evm::{Address, ContractError, TokenContract, TxHash, U256, WriteCall};

pub const CONTRACT: &str = "0x1234567890abcdef1234567890abcdef12345678";
pub const ALICE: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const BOB: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

pub fn alice() -> Address {
    ALICE.parse().unwrap()
}

pub fn bob() -> Address {
    BOB.parse().unwrap()
}

pub fn tokens(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

pub fn rpc_error(code: Option<i64>, revert: Option<&'static str>, message: &str) -> ContractError {
    ContractError::Rpc {
        code,
        revert,
        message: message.to_string(),
    }
}

/// What the next `submit` / `confirm` returns.
#[derive(Debug, Clone)]
pub enum Script {
    Ok,
    Fail {
        code: Option<i64>,
        revert: Option<&'static str>,
        message: String,
    },
}

impl Script {
    pub fn fail(message: &str) -> Self {
        Self::Fail {
            code: None,
            revert: None,
            message: message.to_string(),
        }
    }

    fn result(&self) -> Result<(), ContractError> {
        match self {
            Self::Ok => Ok(()),
            Self::Fail {
                code,
                revert,
                message,
            } => Err(rpc_error(*code, *revert, message)),
        }
    }
}

#[derive(Debug)]
pub struct ScriptedContract {
    pub name: String,
    pub symbol: String,
    pub total_supply: U256,
    pub balance: U256,
    pub paused: bool,
    pub admins: Mutex<HashSet<Address>>,
    pub minters: Mutex<HashSet<Address>>,
    /// Reads named here fail (e.g. `"totalSupply"`, `"isAdmin"`).
    pub failing_reads: Mutex<HashSet<&'static str>>,
    pub submit_script: Mutex<Script>,
    pub confirm_script: Mutex<Script>,
    /// Confirmation stays pending until released.
    pub hold_confirmation: Mutex<Option<tokio::sync::oneshot::Receiver<()>>>,
    pub writes: Mutex<Vec<WriteCall>>,
    pub read_count: AtomicU32,
}

impl Default for ScriptedContract {
    fn default() -> Self {
        Self {
            name: "AdwaitToken".into(),
            symbol: "ADWT".into(),
            total_supply: tokens(1_000_000),
            balance: tokens(250),
            paused: false,
            admins: Mutex::new(HashSet::new()),
            minters: Mutex::new(HashSet::new()),
            failing_reads: Mutex::new(HashSet::new()),
            submit_script: Mutex::new(Script::Ok),
            confirm_script: Mutex::new(Script::Ok),
            hold_confirmation: Mutex::new(None),
            writes: Mutex::new(Vec::new()),
            read_count: AtomicU32::new(0),
        }
    }
}

impl ScriptedContract {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn grant_admin(&self, account: Address) {
        self.admins.lock().unwrap().insert(account);
    }

    pub fn grant_minter(&self, account: Address) {
        self.minters.lock().unwrap().insert(account);
    }

    pub fn fail_read(&self, name: &'static str) {
        self.failing_reads.lock().unwrap().insert(name);
    }

    pub fn heal_read(&self, name: &'static str) {
        self.failing_reads.lock().unwrap().remove(name);
    }

    pub fn script_submit(&self, script: Script) {
        *self.submit_script.lock().unwrap() = script;
    }

    pub fn script_confirm(&self, script: Script) {
        *self.confirm_script.lock().unwrap() = script;
    }

    /// Makes the next confirmation wait until the returned sender fires.
    pub fn hold_next_confirmation(&self) -> tokio::sync::oneshot::Sender<()> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        *self.hold_confirmation.lock().unwrap() = Some(rx);
        tx
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().unwrap().clone()
    }

    pub fn reads(&self) -> u32 {
        self.read_count.load(Ordering::SeqCst)
    }

    fn read<T>(&self, name: &'static str, value: T) -> Result<T, ContractError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        if self.failing_reads.lock().unwrap().contains(name) {
            return Err(rpc_error(None, None, &format!("{name} unavailable")));
        }
        Ok(value)
    }
}

fn tx_hash_for(index: usize) -> TxHash {
    TxHash::with_last_byte(index as u8 + 1)
}

impl TokenContract for ScriptedContract {
    async fn name(&self) -> Result<String, ContractError> {
        self.read("name", self.name.clone())
    }

    async fn symbol(&self) -> Result<String, ContractError> {
        self.read("symbol", self.symbol.clone())
    }

    async fn total_supply(&self) -> Result<U256, ContractError> {
        self.read("totalSupply", self.total_supply)
    }

    async fn balance_of(&self, _account: Address) -> Result<U256, ContractError> {
        self.read("balanceOf", self.balance)
    }

    async fn paused(&self) -> Result<bool, ContractError> {
        self.read("paused", self.paused)
    }

    async fn is_admin(&self, account: Address) -> Result<bool, ContractError> {
        let value = self.admins.lock().unwrap().contains(&account);
        self.read("isAdmin", value)
    }

    async fn is_minter(&self, account: Address) -> Result<bool, ContractError> {
        let value = self.minters.lock().unwrap().contains(&account);
        self.read("isMinter", value)
    }

    async fn submit(&self, call: WriteCall) -> Result<TxHash, ContractError> {
        let index = {
            let mut writes = self.writes.lock().unwrap();
            writes.push(call);
            writes.len() - 1
        };
        let script = self.submit_script.lock().unwrap().clone();
        script.result().map(|()| tx_hash_for(index))
    }

    async fn confirm(&self, _tx: TxHash) -> Result<(), ContractError> {
        let hold = self.hold_confirmation.lock().unwrap().take();
        if let Some(release) = hold {
            let _ = release.await;
        }
        let script = self.confirm_script.lock().unwrap().clone();
        script.result()
    }
}

/// Waits (in virtual time) until the watched value satisfies `f`.
pub async fn wait_until<T: Clone>(
    rx: &mut tokio::sync::watch::Receiver<T>,
    f: impl FnMut(&T) -> bool,
) -> T {
    let value = tokio::time::timeout(std::time::Duration::from_secs(120), rx.wait_for(f))
        .await
        .expect("timed out waiting for value")
        .expect("publisher dropped");
    T::clone(&value)
}
