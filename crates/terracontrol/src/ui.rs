//! Interactive terminal panel.
//!
//! Renders the shared panel state with ratatui and turns key presses into
//! dispatcher calls. The panel lock is only ever held for reads and edits,
//! never across a call, because the hooks take it themselves.

use std::io;
use std::time::Duration;

use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use panel_core::log::{BadgeStyle, RowStyle};
use panel_core::panel::{start_polling, ButtonState, Field, FieldState, InputField};
use panel_core::{Action, LiveLogClient, LogItem, PanelConfig, PanelState};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tracing::info;

use crate::session::Session;

const COLOR_TEAL: Color = Color::Rgb(0, 168, 150);
const COLOR_GREEN: Color = Color::Rgb(46, 204, 113);
const COLOR_AMBER: Color = Color::Rgb(243, 156, 18);
const COLOR_RED: Color = Color::Rgb(231, 76, 60);
const COLOR_INFO: Color = Color::Rgb(142, 142, 147);
const COLOR_YELLOW: Color = Color::Rgb(245, 196, 66);
const COLOR_CYAN: Color = Color::Rgb(64, 212, 255);
const COLOR_BLUE: Color = Color::Rgb(52, 120, 246);

const REDRAW_INTERVAL: Duration = Duration::from_millis(100);
const HELP: &str =
    "Tab field  Enter send  ↑↓ player  F7 kick  F8 ban  F5 refresh  F2 restart  F3 password  PgUp/PgDn/End log  Esc quit";

/// What a key press asks the panel to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Quit,
    NextField,
    PrevField,
    Submit,
    Refresh,
    Restart,
    TogglePassword,
    Kick,
    Ban,
    SelectUp,
    SelectDown,
    PageUp,
    PageDown,
    Follow,
    Type(char),
    Erase,
}

fn intent(key: KeyEvent) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            _ => None,
        };
    }
    let intent = match key.code {
        KeyCode::Esc => Intent::Quit,
        KeyCode::Tab => Intent::NextField,
        KeyCode::BackTab => Intent::PrevField,
        KeyCode::Enter => Intent::Submit,
        KeyCode::F(5) => Intent::Refresh,
        KeyCode::F(2) => Intent::Restart,
        KeyCode::F(3) => Intent::TogglePassword,
        KeyCode::F(7) => Intent::Kick,
        KeyCode::F(8) => Intent::Ban,
        KeyCode::Up => Intent::SelectUp,
        KeyCode::Down => Intent::SelectDown,
        KeyCode::PageUp => Intent::PageUp,
        KeyCode::PageDown => Intent::PageDown,
        KeyCode::End => Intent::Follow,
        KeyCode::Backspace => Intent::Erase,
        KeyCode::Char(c) => Intent::Type(c),
        _ => return None,
    };
    Some(intent)
}

struct UiState {
    focus: Field,
    selected: usize,
    log_rows: usize,
    notice: Option<(String, Color)>,
}

impl UiState {
    fn new() -> Self {
        Self {
            focus: Field::Message,
            selected: 0,
            log_rows: 1,
            notice: None,
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let fields = Field::ALL;
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (index + 1) % fields.len()
        } else {
            (index + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    fn notify(&mut self, text: impl Into<String>, color: Color) {
        self.notice = Some((text.into(), color));
    }

    /// Keeps the selection inside a player list that may have shrunk.
    fn clamp_selection(&mut self, players: usize) {
        self.selected = self.selected.min(players.saturating_sub(1));
    }
}

/// Runs its closure when dropped, so early `?` returns still restore the
/// terminal.
struct RestoreOnDrop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.0.take() {
            restore();
        }
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Runs the interactive panel until the user quits.
pub async fn run_panel(config: PanelConfig) -> anyhow::Result<()> {
    let session = Session::open(&config).await?;

    // Fill the status block right away instead of waiting a full poll period
    session
        .dispatcher
        .call_action(Action::FullStatus, None)
        .await?;
    let poll = start_polling(&session.dispatcher, &config);
    let feed = {
        let panel = session.panel.clone();
        let client = LiveLogClient::new(config.base_url.clone());
        tokio::spawn(async move { client.run(&panel).await })
    };

    enable_raw_mode()?;
    let restore = RestoreOnDrop(Some(restore_terminal));
    execute!(io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut ui = UiState::new();
    let result = event_loop(&mut terminal, &mut ui, &session, &config).await;
    drop(terminal);
    drop(restore);

    poll.abort();
    feed.abort();
    info!("👋 Panel closed");
    result
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    ui: &mut UiState,
    session: &Session,
    config: &PanelConfig,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);

    loop {
        draw(terminal, ui, session).await?;

        tokio::select! {
            _ = redraw.tick() => {}
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(intent) = intent(key) {
                        if intent == Intent::Quit {
                            return Ok(());
                        }
                        apply(intent, ui, session, config).await?;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            }
        }
    }
}

async fn draw<B: Backend>(
    terminal: &mut Terminal<B>,
    ui: &mut UiState,
    session: &Session,
) -> anyhow::Result<()> {
    let mut panel = session.panel.write().await;
    ui.clamp_selection(panel.status.players.len());
    let mut rows = ui.log_rows;
    terminal.draw(|frame| rows = render_ui(frame, ui, &mut panel))?;
    ui.log_rows = rows;
    Ok(())
}

async fn apply(
    intent: Intent,
    ui: &mut UiState,
    session: &Session,
    config: &PanelConfig,
) -> anyhow::Result<()> {
    let dispatcher = &session.dispatcher;
    let players = session.panel.read().await.status.players.len();
    ui.clamp_selection(players);
    match intent {
        Intent::Quit => {}
        Intent::NextField => ui.cycle_focus(true),
        Intent::PrevField => ui.cycle_focus(false),
        Intent::Type(c) => edit_field(ui.focus, session, config, |value| value.push(c)).await,
        Intent::Erase => {
            edit_field(ui.focus, session, config, |value| {
                value.pop();
            })
            .await
        }
        Intent::Submit => {
            let field = ui.focus;
            let outcome = dispatcher.call_action(field.action(), None).await?;
            if outcome.is_blocked() {
                ui.notify(format!("{} not sent", field.label()), COLOR_RED);
            } else {
                ui.notify(format!("{} sent", field.action()), COLOR_GREEN);
            }
        }
        Intent::Refresh => {
            dispatcher.call_action(Action::FullStatus, None).await?;
            ui.notify("Refreshing status", COLOR_INFO);
        }
        Intent::Restart => {
            let outcome = dispatcher.call_action(Action::Restart, None).await?;
            if outcome.is_blocked() {
                ui.notify("Server is currently restarting", COLOR_AMBER);
            } else {
                ui.notify("Restart requested", COLOR_AMBER);
            }
        }
        Intent::TogglePassword => {
            let mut panel = session.panel.write().await;
            panel.password_hidden = !panel.password_hidden;
        }
        Intent::Kick | Intent::Ban => {
            let action = if intent == Intent::Kick {
                Action::Kick
            } else {
                Action::Ban
            };
            let player = {
                let panel = session.panel.read().await;
                panel
                    .status
                    .players
                    .get(ui.selected)
                    .map(|player| player.name.clone())
            };
            match player {
                Some(name) => {
                    dispatcher.call_action(action, Some(&name)).await?;
                    ui.notify(format!("{action} {name}"), COLOR_AMBER);
                }
                None => ui.notify("No player selected", COLOR_INFO),
            }
        }
        Intent::SelectUp => ui.selected = ui.selected.saturating_sub(1),
        Intent::SelectDown => {
            if ui.selected + 1 < players {
                ui.selected += 1;
            }
        }
        Intent::PageUp => session.panel.write().await.log.scroll_up(ui.log_rows),
        Intent::PageDown => session.panel.write().await.log.scroll_down(ui.log_rows),
        Intent::Follow => session.panel.write().await.log.scroll_to_bottom(),
    }
    Ok(())
}

async fn edit_field(
    field: Field,
    session: &Session,
    config: &PanelConfig,
    edit: impl FnOnce(&mut String),
) {
    let mut panel = session.panel.write().await;
    edit(&mut panel.field_mut(field).value);
    if field == Field::Message {
        panel.verify_message(&config.message_len);
    }
}

/// Draws one frame and returns the number of log rows on screen.
fn render_ui(frame: &mut Frame<'_>, ui: &UiState, panel: &mut PanelState) -> usize {
    let [status_area, body, inputs_area, footer] = Layout::vertical([
        Constraint::Length(7),
        Constraint::Min(6),
        Constraint::Length(5),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    let [players_area, log_area] =
        Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)]).areas(body);

    render_status_panel(frame, status_area, panel);
    render_players_panel(frame, players_area, ui, panel);
    let rows = render_log_panel(frame, log_area, panel);
    render_inputs_panel(frame, inputs_area, ui, panel);
    render_footer(frame, footer, ui);
    rows
}

fn render_status_panel(frame: &mut Frame<'_>, area: Rect, panel: &PanelState) {
    let status = &panel.status;
    let block = panel_block("Server", false);
    if !status.loaded {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Waiting for server status...",
                Style::default().fg(COLOR_INFO),
            ))
            .block(block),
            area,
        );
        return;
    }

    let (state, state_color) = if status.online {
        ("Online", COLOR_GREEN)
    } else {
        ("Offline", COLOR_RED)
    };
    let mut header = vec![
        Span::styled(status.world_name.clone(), header_style()),
        Span::raw("  "),
        Span::styled(state, Style::default().fg(state_color)),
        Span::styled(format!("  v{}", status.version), Style::default().fg(COLOR_INFO)),
    ];
    if panel.restart_busy {
        header.push(Span::styled(
            "  RESTARTING",
            Style::default().fg(COLOR_AMBER).add_modifier(Modifier::BOLD),
        ));
    }

    let lines = vec![
        Line::from(header),
        Line::from(Span::styled(status.seed_label(), value_style())),
        Line::from(Span::styled(status.motd_label(), value_style())),
        Line::from(Span::styled(
            status.password_label(panel.password_hidden),
            value_style(),
        )),
        Line::from(Span::styled(status.player_count_label(), label_style())),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_players_panel(frame: &mut Frame<'_>, area: Rect, ui: &UiState, panel: &PanelState) {
    let players = &panel.status.players;
    let items: Vec<ListItem> = players
        .iter()
        .map(|player| {
            ListItem::new(Line::from(vec![
                Span::styled(player.name.clone(), value_style()),
                Span::raw("  "),
                Span::styled(player.ip.clone(), Style::default().fg(COLOR_INFO)),
            ]))
        })
        .collect();
    let mut state = ListState::default();
    if !players.is_empty() {
        state.select(Some(ui.selected.min(players.len() - 1)));
    }
    let list = List::new(items)
        .block(panel_block("Players", false))
        .highlight_style(Style::default().fg(COLOR_TEAL).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_log_panel(frame: &mut Frame<'_>, area: Rect, panel: &mut PanelState) -> usize {
    let title = if panel.log.is_at_bottom() {
        "Live Log"
    } else {
        "Live Log (scrolled)"
    };
    let block = panel_block(title, false);
    let rows = block.inner(area).height as usize;
    panel.log.set_viewport(rows);
    let lines: Vec<Line> = panel.log.visible().map(log_line).collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
    rows
}

fn log_line(item: &LogItem) -> Line<'static> {
    match item {
        LogItem::Notice(text) => Line::from(Span::styled(
            text.clone(),
            Style::default().fg(COLOR_INFO).add_modifier(Modifier::ITALIC),
        )),
        LogItem::Entry(entry) => {
            let badge_color = match entry.badge.style {
                BadgeStyle::Brand => COLOR_BLUE,
                BadgeStyle::Info => COLOR_CYAN,
                BadgeStyle::Success => COLOR_GREEN,
                BadgeStyle::Warning => COLOR_AMBER,
                BadgeStyle::Error => COLOR_RED,
            };
            let text_style = match entry.row {
                Some(RowStyle::Warn) => Style::default().fg(COLOR_YELLOW),
                Some(RowStyle::Error) => Style::default().fg(COLOR_RED),
                Some(RowStyle::Info) | None => value_style(),
            };
            Line::from(vec![
                Span::styled(
                    format!(" {} ", entry.badge.label),
                    Style::default()
                        .fg(Color::Black)
                        .bg(badge_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(entry.text.clone(), text_style),
            ])
        }
    }
}

fn render_inputs_panel(frame: &mut Frame<'_>, area: Rect, ui: &UiState, panel: &PanelState) {
    let lines: Vec<Line> = Field::ALL
        .iter()
        .map(|field| {
            let input = panel.field(*field);
            let focused = *field == ui.focus;
            let mut spans = vec![
                Span::styled(if focused { "› " } else { "  " }, label_style()),
                Span::styled(format!("{:<9}", field.label()), label_style()),
                Span::styled(input_text(*field, input, panel.password_hidden), field_style(input.state)),
            ];
            if focused {
                spans.push(Span::styled("▏", Style::default().fg(COLOR_TEAL)));
            }
            if *field == Field::Message {
                spans.push(Span::raw("  "));
                spans.push(Span::styled("[Send]", button_style(panel.send_button)));
            }
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(panel_block("Controls", true)), area);
}

fn input_text(field: Field, input: &InputField, hidden: bool) -> String {
    if field == Field::Password && hidden {
        "*".repeat(input.value.chars().count())
    } else {
        input.value.clone()
    }
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, ui: &UiState) {
    let line = match &ui.notice {
        Some((text, color)) => Line::from(vec![
            Span::styled(text.clone(), Style::default().fg(*color)),
            Span::raw("  "),
            Span::styled(HELP, Style::default().fg(COLOR_INFO)),
        ]),
        None => Line::from(Span::styled(HELP, Style::default().fg(COLOR_INFO))),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn panel_block(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(COLOR_TEAL)
    } else {
        Style::default().fg(COLOR_INFO)
    };
    Block::default()
        .title(Span::styled(format!(" {title} "), header_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(border_style)
}

fn field_style(state: FieldState) -> Style {
    match state {
        FieldState::Neutral => value_style(),
        FieldState::Success => Style::default().fg(COLOR_GREEN),
        FieldState::Error => Style::default().fg(COLOR_RED),
    }
}

fn button_style(state: ButtonState) -> Style {
    let color = match state {
        ButtonState::Brand => COLOR_BLUE,
        ButtonState::Success => COLOR_GREEN,
        ButtonState::Error => COLOR_RED,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn label_style() -> Style {
    Style::default().fg(COLOR_CYAN)
}

fn header_style() -> Style {
    Style::default()
        .fg(COLOR_YELLOW)
        .add_modifier(Modifier::BOLD)
}

fn value_style() -> Style {
    Style::default().fg(Color::White)
}
