//! Keyboard focus and key bindings.

use adwait_dashboard::{Field, Operation, PanelKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input(PanelKind, Field),
    Button(PanelKind, Operation),
}

impl Focus {
    pub fn panel(self) -> PanelKind {
        match self {
            Self::Input(kind, _) | Self::Button(kind, _) => kind,
        }
    }
}

/// Tab order across the mounted panels: each operation's inputs, then its button.
pub fn focus_order(panels: &[PanelKind]) -> Vec<Focus> {
    let mut order = Vec::new();
    for &kind in panels {
        for &op in kind.operations() {
            order.extend(op.fields().iter().map(|&field| Focus::Input(kind, field)));
            order.push(Focus::Button(kind, op));
        }
    }
    order
}

/// Moves one step through `order`, wrapping at either end.
///
/// Without a current focus (or one that is no longer mounted) the first or
/// last element is chosen.
pub fn step(order: &[Focus], current: Option<Focus>, forward: bool) -> Option<Focus> {
    if order.is_empty() {
        return None;
    }
    let last = order.len() - 1;
    let index = match current.and_then(|focus| order.iter().position(|f| *f == focus)) {
        Some(i) if forward => if i == last { 0 } else { i + 1 },
        Some(i) => if i == 0 { last } else { i - 1 },
        None if forward => 0,
        None => last,
    };
    Some(order[index])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Next,
    Previous,
    /// Leave the focused input.
    Blur,
    /// Press the focused button, or move on from an input.
    Activate,
    Type(char),
    Backspace,
    DismissNotice,
    Connect,
    Disconnect,
}

pub fn map_key(key: KeyEvent, focus: Option<Focus>) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let typing = matches!(focus, Some(Focus::Input(..)));

    let action = match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('x') if ctrl => Action::DismissNotice,
        KeyCode::Esc if typing => Action::Blur,
        KeyCode::Esc => Action::Quit,
        KeyCode::Tab | KeyCode::Down => Action::Next,
        KeyCode::BackTab | KeyCode::Up => Action::Previous,
        KeyCode::Enter => Action::Activate,
        KeyCode::Backspace if typing => Action::Backspace,
        KeyCode::Char(c) if typing && !ctrl => Action::Type(c),
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') => Action::Connect,
        KeyCode::Char('d') => Action::Disconnect,
        _ => return None,
    };
    Some(action)
}
