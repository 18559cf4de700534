//! Drawing the dashboard with ratatui.
//!
//! Everything here works on a [`ViewModel`] copied out of the live dashboard
//! once per frame, so rendering never touches the chain.

use adwait_core::config::DEFAULT_RPC_URL;
use adwait_core::format::shorten_identifier;
use adwait_core::roles::{
    PanelSet, RoleBadge, Screen, NO_ROLES_BODY, NO_ROLES_TITLE, ROLE_EXPLANATIONS,
};
use adwait_dashboard::{Notice, PanelKind, PanelState, TokenSnapshot};
use adwait_evm::Address;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::input::Focus;

pub const APP_TITLE: &str = "AdwaitToken DApp";
pub const APP_SUBTITLE: &str = "ERC20 with Role-Based Access Control";
pub const WELCOME_TITLE: &str = "Welcome!";
pub const WELCOME_BODY: &str = "Connect your wallet to interact with the AdwaitToken smart contract. \
     View your balance, transfer tokens, and access role-based features.";

/// Everything one frame needs.
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub contract: Address,
    pub rpc_url: String,
    pub account: Option<Address>,
    pub snapshot: TokenSnapshot,
    pub badges: Vec<RoleBadge>,
    pub screen: Screen,
    pub panels: Vec<(PanelKind, PanelState)>,
    pub focus: Option<Focus>,
    pub status: Option<String>,
}

impl ViewModel {
    fn panel(&self, kind: PanelKind) -> Option<&PanelState> {
        self.panels
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, state)| state)
    }
}

/// Human name of the network behind `rpc_url`.
pub fn network_label(rpc_url: &str) -> &str {
    if rpc_url == DEFAULT_RPC_URL {
        "Monad Testnet"
    } else {
        rpc_url
    }
}

pub fn draw(frame: &mut Frame, model: &ViewModel) {
    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], model);
    match model.screen {
        Screen::Welcome => draw_welcome(frame, chunks[1]),
        Screen::Connected(set) => draw_connected(frame, chunks[1], model, set),
    }
    draw_footer(frame, chunks[2], model);
}

fn badge_color(badge: &RoleBadge) -> Color {
    match badge.label {
        "ADMIN" => Color::Red,
        "MINTER" => Color::Green,
        _ => Color::Blue,
    }
}

fn draw_header(frame: &mut Frame, area: Rect, model: &ViewModel) {
    let mut title = vec![Span::styled(
        APP_TITLE,
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )];
    for badge in &model.badges {
        title.push(Span::raw("  "));
        title.push(Span::styled(
            format!(" {} ", badge.label),
            Style::default().fg(Color::Black).bg(badge_color(badge)),
        ));
    }

    let account = match model.account {
        Some(account) => Span::styled(
            format!("● {}", shorten_identifier(&account.to_string(), 4)),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("Not connected", Style::default().fg(Color::DarkGray)),
    };

    let lines = vec![
        Line::from(title),
        Line::from(vec![
            Span::styled(APP_SUBTITLE, Style::default().fg(Color::Gray)),
            Span::raw("   "),
            account,
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn draw_welcome(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            WELCOME_TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(WELCOME_BODY),
        Line::from(""),
        Line::from(Span::styled(
            "Press c to connect your wallet",
            Style::default().fg(Color::Cyan),
        )),
    ];
    let card = centered(area, 64, 12);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        card,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_connected(frame: &mut Frame, area: Rect, model: &ViewModel, set: PanelSet) {
    let rows = Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).split(area);
    draw_stats(frame, rows[0], &model.snapshot);

    let columns =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[1]);

    let mut left: Vec<PanelKind> = Vec::new();
    if set.shows_admin() {
        left.push(PanelKind::Admin);
    }
    if set.shows_minter() {
        left.push(PanelKind::Minter);
    }
    if left.is_empty() {
        draw_no_roles(frame, columns[0]);
    } else {
        draw_panel_column(frame, columns[0], model, &left, None);
    }

    let about = about_roles();
    let about_height = about.len() as u16 + 2;
    draw_panel_column(
        frame,
        columns[1],
        model,
        &[PanelKind::Transfer],
        Some((about, about_height)),
    );
}

fn draw_stats(frame: &mut Frame, area: Rect, snapshot: &TokenSnapshot) {
    let status = if snapshot.is_paused() {
        Span::styled(snapshot.status_text(), Style::default().fg(Color::Red))
    } else {
        Span::styled(snapshot.status_text(), Style::default().fg(Color::Green))
    };
    let label = Style::default().fg(Color::Gray);
    let lines = vec![
        Line::from(vec![Span::styled("Status:        ", label), status]),
        Line::from(vec![
            Span::styled("Total Supply:  ", label),
            Span::raw(snapshot.supply_text()),
        ]),
        Line::from(vec![
            Span::styled("Your Balance:  ", label),
            Span::raw(snapshot.balance_text(true)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", snapshot.title())),
        ),
        area,
    );
}

fn draw_no_roles(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            NO_ROLES_TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(NO_ROLES_BODY, Style::default().fg(Color::Gray))),
    ];
    let height = area.height.min(8);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        Rect { height, ..area },
    );
}

fn about_roles() -> Vec<Line<'static>> {
    ROLE_EXPLANATIONS
        .iter()
        .map(|(role, text)| {
            let color = match *role {
                "ADMIN" => Color::Red,
                "MINTER" => Color::Green,
                _ => Color::Blue,
            };
            Line::from(vec![
                Span::styled(
                    format!("{role}: "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*text),
            ])
        })
        .collect()
}

/// Stacks panels top to bottom, with an optional trailing static block.
fn draw_panel_column(
    frame: &mut Frame,
    area: Rect,
    model: &ViewModel,
    kinds: &[PanelKind],
    trailer: Option<(Vec<Line<'static>>, u16)>,
) {
    let mut blocks: Vec<(Paragraph, u16)> = kinds
        .iter()
        .filter_map(|&kind| {
            let state = model.panel(kind)?;
            let lines = panel_lines(kind, state, model.focus);
            let height = lines.len() as u16 + 2;
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", kind.title()));
            Some((Paragraph::new(lines).block(block), height))
        })
        .collect();
    if let Some((lines, height)) = trailer {
        let block = Block::default().borders(Borders::ALL).title(" About Roles ");
        blocks.push((
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
            height,
        ));
    }

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (widget, height) in blocks {
        if y >= bottom {
            break;
        }
        let height = height.min(bottom - y);
        frame.render_widget(widget, Rect { y, height, ..area });
        y += height;
    }
}

fn notice_line(notice: &Notice) -> Line<'static> {
    let color = match notice {
        Notice::Success { .. } => Color::Green,
        Notice::Failure(_) => Color::Red,
        Notice::Validation(_) => Color::Yellow,
    };
    let mut spans = vec![Span::styled(notice.to_string(), Style::default().fg(color))];
    if let Notice::Success { tx, .. } = notice {
        spans.push(Span::styled(
            format!("  tx {}", shorten_identifier(&tx.to_string(), 6)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn panel_lines(kind: PanelKind, state: &PanelState, focus: Option<Focus>) -> Vec<Line<'static>> {
    let focused = Style::default().add_modifier(Modifier::REVERSED);
    let mut lines = vec![Line::from(Span::styled(
        kind.subtitle(),
        Style::default().fg(Color::Gray),
    ))];
    if let Some(notice) = &state.notice {
        lines.push(notice_line(notice));
    }

    let busy = state.phase.is_busy();
    for &op in kind.operations() {
        for &field in op.fields() {
            let value = state.input(field);
            let text = if value.is_empty() {
                Span::styled(kind.placeholder(field), Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(value.to_string())
            };
            let mut spans = vec![Span::raw(format!("{}: ", field.label())), text];
            if focus == Some(Focus::Input(kind, field)) {
                spans.push(Span::styled(" ", focused));
            }
            lines.push(Line::from(spans));
        }

        let label = match state.phase.operation() {
            Some(active) if active == op => state.phase.progress_text().unwrap_or(op.label()),
            _ => op.label(),
        };
        let mut style = if busy {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        if focus == Some(Focus::Button(kind, op)) {
            style = style.patch(focused);
        }
        lines.push(Line::from(Span::styled(format!("[ {label} ]"), style)));
    }
    lines
}

fn draw_footer(frame: &mut Frame, area: Rect, model: &ViewModel) {
    let deployed = format!(
        "Deployed on {} • Contract: {}",
        network_label(&model.rpc_url),
        shorten_identifier(&model.contract.to_string(), 4)
    );
    let hints = match (&model.status, model.account) {
        (Some(status), _) => Span::styled(status.clone(), Style::default().fg(Color::Yellow)),
        (None, None) => Span::raw("c connect · q quit"),
        (None, Some(_)) => {
            Span::raw("Tab/↑↓ move · Enter submit · Ctrl-X dismiss · d disconnect · Esc quit")
        }
    };
    let lines = vec![
        Line::from(Span::styled(deployed, Style::default().fg(Color::DarkGray))),
        Line::from(hints),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP)),
        area,
    );
}
