//! Interactive terminal dashboard.
//!
//! The screen runs in the alternate buffer with raw mode enabled; both are
//! restored by RAII guards even if the loop errors out or panics.

use std::io::{self, stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Handle;
use tracing::{info, warn};

use adwait_core::format::shorten_identifier;
use adwait_dashboard::{Dashboard, SubmitError};
use adwait_evm::EvmAdapter;

use crate::commands::{self, CliResult, Session, WalletSource};

pub mod input;
pub mod render;

use input::{Action, Focus};
use render::ViewModel;

/// How long to wait for a key before redrawing.
const FRAME: Duration = Duration::from_millis(100);

/// RAII guard that leaves the alternate screen on drop.
struct AlternateScreenGuard;

impl AlternateScreenGuard {
    fn enter() -> io::Result<Self> {
        execute!(stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for AlternateScreenGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), LeaveAlternateScreen);
    }
}

/// RAII guard that disables raw mode on drop.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Runs `f` with the normal terminal back, e.g. for a password prompt.
fn suspended<T>(terminal: &mut Term, f: impl FnOnce() -> CliResult<T>) -> CliResult<T> {
    terminal::disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    let result = f();
    execute!(stdout(), EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    terminal.clear()?;
    result
}

/// Dashboard state owned by the UI loop.
pub(crate) struct App {
    session: Session,
    wallet: Option<WalletSource>,
    dashboard: Dashboard<EvmAdapter>,
    focus: Option<Focus>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(
        session: Session,
        wallet: Option<WalletSource>,
        dashboard: Dashboard<EvmAdapter>,
    ) -> Self {
        Self {
            session,
            wallet,
            dashboard,
            focus: None,
            status: None,
            should_quit: false,
        }
    }

    fn order(&self) -> Vec<Focus> {
        input::focus_order(&self.dashboard.mounted())
    }

    /// Follows role changes; focus on an unmounted panel is dropped.
    fn tick(&mut self) {
        if self.dashboard.sync_panels() {
            let order = self.order();
            if self.focus.is_some_and(|focus| !order.contains(&focus)) {
                self.focus = None;
            }
        }
    }

    fn model(&self) -> ViewModel {
        let panels = self
            .dashboard
            .mounted()
            .into_iter()
            .filter_map(|kind| Some((kind, self.dashboard.panel(kind)?.state())))
            .collect();
        ViewModel {
            contract: self.session.binding.address(),
            rpc_url: self.session.config.rpc_url.clone(),
            account: self.dashboard.account(),
            snapshot: self.dashboard.snapshot(),
            badges: self.dashboard.badges(),
            screen: self.dashboard.screen(),
            panels,
            focus: self.focus,
            status: self.status.clone(),
        }
    }

    fn needs_password(&self) -> bool {
        !self.dashboard.is_connected()
            && self.wallet.as_ref().is_some_and(WalletSource::needs_password)
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Next => self.focus = input::step(&self.order(), self.focus, true),
            Action::Previous => self.focus = input::step(&self.order(), self.focus, false),
            Action::Blur => self.focus = None,
            Action::Activate => self.activate(),
            Action::Type(c) => self.edit(|value| value.push(c)),
            Action::Backspace => self.edit(|value| {
                value.pop();
            }),
            Action::DismissNotice => {
                self.status = None;
                if let Some(panel) = self.focus.and_then(|f| self.dashboard.panel(f.panel())) {
                    panel.dismiss_notice();
                }
            }
            Action::Connect => self.connect(None),
            Action::Disconnect => self.disconnect(),
        }
    }

    fn edit(&mut self, f: impl FnOnce(&mut String)) {
        let Some(Focus::Input(kind, field)) = self.focus else {
            return;
        };
        if let Some(panel) = self.dashboard.panel(kind) {
            let mut value = panel.input(field);
            f(&mut value);
            panel.set_input(field, value);
        }
    }

    fn activate(&mut self) {
        match self.focus {
            Some(Focus::Input(..)) => self.apply(Action::Next),
            Some(Focus::Button(kind, op)) => {
                let Some(panel) = self.dashboard.panel(kind) else {
                    return;
                };
                match panel.submit(op) {
                    // The task reports back through the panel state.
                    Ok(_) => {}
                    Err(SubmitError::Busy) => {}
                    Err(SubmitError::Invalid(e)) => info!(?op, "rejected input: {e}"),
                    Err(e) => warn!(?op, "submit refused: {e}"),
                }
            }
            None => {}
        }
    }

    fn connect(&mut self, password: Option<&str>) {
        if self.dashboard.is_connected() {
            return;
        }
        let Some(source) = &self.wallet else {
            self.status = Some(
                "No wallet configured: set keystore_path or ADWAIT_PRIVATE_KEY".to_string(),
            );
            return;
        };

        let connected =
            Handle::current().block_on(commands::connect(&self.session, source, password));
        match connected {
            Ok(adapter) => {
                let account = adapter.account();
                self.dashboard.reconnect(adapter, account);
                self.focus = None;
                self.status = account
                    .map(|a| format!("Connected {}", shorten_identifier(&a.to_string(), 4)));
            }
            Err(e) => {
                warn!("wallet connection failed: {e}");
                self.status = Some(format!("Connection failed: {e}"));
            }
        }
    }

    fn disconnect(&mut self) {
        if !self.dashboard.is_connected() {
            return;
        }
        match self.session.read_only() {
            Ok(adapter) => {
                self.dashboard.reconnect(Arc::new(adapter), None);
                self.focus = None;
                self.status = Some("Disconnected".to_string());
            }
            Err(e) => self.status = Some(format!("Disconnect failed: {e}")),
        }
    }
}

/// Runs the dashboard until the user quits. Blocks the calling thread.
pub(crate) fn run(app: &mut App) -> CliResult {
    let _raw = RawModeGuard::enable()?;
    let _screen = AlternateScreenGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;
    info!("dashboard started");

    while !app.should_quit {
        app.tick();
        terminal.draw(|frame| render::draw(frame, &app.model()))?;

        if !event::poll(FRAME)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match input::map_key(key, app.focus) {
            Some(Action::Connect) if app.needs_password() => {
                match suspended(&mut terminal, commands::prompt_password) {
                    Ok(password) => app.connect(Some(&password)),
                    Err(e) => app.status = Some(format!("Connection cancelled: {e}")),
                }
            }
            Some(action) => app.apply(action),
            None => {}
        }
    }

    terminal.show_cursor()?;
    info!("dashboard closed");
    Ok(())
}
