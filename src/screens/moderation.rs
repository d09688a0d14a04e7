/// Moderation Screen - pending profiles, reports and stats from the moderator API

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tracing::{debug, info};

use crate::core::{ApiError, ModAction, ModerationDesk, ModeratorApi, Notice, NoticeKind, Snapshot};
use crate::utils::{format_created_at, or_dash, text_bar, truncate_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskTab {
    Pending,
    Reports,
    Stats,
}

impl DeskTab {
    pub fn title(&self) -> &'static str {
        match self {
            DeskTab::Pending => "Pending",
            DeskTab::Reports => "Reports",
            DeskTab::Stats => "Stats",
        }
    }

    pub fn all() -> &'static [DeskTab] {
        &[DeskTab::Pending, DeskTab::Reports, DeskTab::Stats]
    }

    fn next(self) -> Self {
        match self {
            DeskTab::Pending => DeskTab::Reports,
            DeskTab::Reports => DeskTab::Stats,
            DeskTab::Stats => DeskTab::Pending,
        }
    }

    fn prev(self) -> Self {
        match self {
            DeskTab::Pending => DeskTab::Stats,
            DeskTab::Reports => DeskTab::Pending,
            DeskTab::Stats => DeskTab::Reports,
        }
    }
}

/// Results coming back from spawned API tasks
#[derive(Debug)]
pub enum DeskEvent {
    Loaded { generation: u64, result: Result<Snapshot, ApiError> },
    ActionSettled(ModAction, Result<(), ApiError>),
}

/// What the UI loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Nothing,
    Quit,
    Refresh,
    Perform(ModAction),
}

/// Moderation screen state
pub struct ModerationState {
    desk: ModerationDesk,
    tab: DeskTab,
    profile_list: ListState,
    report_list: ListState,
    status: Option<Notice>,
    show_detail: bool,
}

impl ModerationState {
    pub fn new(desk: ModerationDesk) -> Self {
        Self {
            desk,
            tab: DeskTab::Pending,
            profile_list: ListState::default(),
            report_list: ListState::default(),
            status: None,
            show_detail: false,
        }
    }

    pub fn desk(&self) -> &ModerationDesk {
        &self.desk
    }

    pub fn tab(&self) -> DeskTab {
        self.tab
    }

    pub fn status(&self) -> Option<&Notice> {
        self.status.as_ref()
    }

    pub fn begin_load(&mut self) -> u64 {
        self.desk.begin_load()
    }

    fn selected_list(&mut self) -> Option<(&mut ListState, usize)> {
        match self.tab {
            DeskTab::Pending => Some((&mut self.profile_list, self.desk.profiles().len())),
            DeskTab::Reports => Some((&mut self.report_list, self.desk.reports().len())),
            DeskTab::Stats => None,
        }
    }

    fn scroll_up(&mut self) {
        if let Some((list, len)) = self.selected_list() {
            if len == 0 {
                return;
            }
            let i = list.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
            list.select(Some(i));
        }
    }

    fn scroll_down(&mut self) {
        if let Some((list, len)) = self.selected_list() {
            if len == 0 {
                return;
            }
            let i = match list.selected() {
                Some(i) if i + 1 < len => i + 1,
                Some(i) => i,
                None => 0,
            };
            list.select(Some(i));
        }
    }

    /// Keep selections inside the lists after they changed
    fn clamp_selection(&mut self) {
        fn clamp(list: &mut ListState, len: usize) {
            if len == 0 {
                list.select(None);
            } else {
                let i = list.selected().unwrap_or(0).min(len - 1);
                list.select(Some(i));
            }
        }
        clamp(&mut self.profile_list, self.desk.profiles().len());
        clamp(&mut self.report_list, self.desk.reports().len());
    }

    pub fn selected_profile_id(&self) -> Option<i64> {
        let i = self.profile_list.selected()?;
        self.desk.profiles().get(i).map(|p| p.id)
    }

    pub fn selected_report_id(&self) -> Option<i64> {
        let i = self.report_list.selected()?;
        self.desk.reports().get(i).map(|r| r.id)
    }

    pub fn handle_key(&mut self, key: KeyCode) -> KeyOutcome {
        if self.show_detail {
            if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.show_detail = false;
            }
            return KeyOutcome::Nothing;
        }

        self.status = None;

        match key {
            KeyCode::Char('q') | KeyCode::Esc => KeyOutcome::Quit,
            KeyCode::Char('r') => KeyOutcome::Refresh,
            KeyCode::Right | KeyCode::Tab => {
                self.tab = self.tab.next();
                KeyOutcome::Nothing
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.tab = self.tab.prev();
                KeyOutcome::Nothing
            }
            KeyCode::Char(c @ '1'..='3') => {
                self.tab = DeskTab::all()[c as usize - '1' as usize];
                KeyOutcome::Nothing
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_up();
                KeyOutcome::Nothing
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_down();
                KeyOutcome::Nothing
            }
            KeyCode::Enter => {
                let has_selection = match self.tab {
                    DeskTab::Pending => self.selected_profile_id().is_some(),
                    DeskTab::Reports => self.selected_report_id().is_some(),
                    DeskTab::Stats => false,
                };
                self.show_detail = has_selection;
                KeyOutcome::Nothing
            }
            KeyCode::Char('a') if self.tab == DeskTab::Pending => self
                .selected_profile_id()
                .map(|id| KeyOutcome::Perform(ModAction::Approve(id)))
                .unwrap_or(KeyOutcome::Nothing),
            KeyCode::Char('x') if self.tab == DeskTab::Pending => self
                .selected_profile_id()
                .map(|id| KeyOutcome::Perform(ModAction::Reject(id)))
                .unwrap_or(KeyOutcome::Nothing),
            KeyCode::Char('v') if self.tab == DeskTab::Reports => self
                .selected_report_id()
                .map(|id| KeyOutcome::Perform(ModAction::ResolveReport(id)))
                .unwrap_or(KeyOutcome::Nothing),
            KeyCode::Char('d') if self.tab == DeskTab::Reports => self
                .selected_report_id()
                .map(|id| KeyOutcome::Perform(ModAction::DismissReport(id)))
                .unwrap_or(KeyOutcome::Nothing),
            _ => KeyOutcome::Nothing,
        }
    }

    /// Apply a task result. When an accepted action calls for a refetch, the
    /// load is started here and its generation returned.
    pub fn apply_event(&mut self, event: DeskEvent) -> Option<u64> {
        let refetch = match event {
            DeskEvent::Loaded { generation, result } => {
                self.desk.apply_snapshot(generation, result);
                None
            }
            DeskEvent::ActionSettled(action, result) => {
                self.desk.apply_action(action, result).then(|| self.desk.begin_load())
            }
        };

        if let Some(last) = self.desk.take_notices().pop() {
            self.status = Some(last);
        }
        self.clamp_selection();
        refetch
    }
}

fn spawn_load(api: &ModeratorApi, tx: &UnboundedSender<DeskEvent>, generation: u64) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = api.snapshot().await;
        let _ = tx.send(DeskEvent::Loaded { generation, result });
    });
}

fn spawn_action(api: &ModeratorApi, tx: &UnboundedSender<DeskEvent>, action: ModAction) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = api.perform(action).await;
        let _ = tx.send(DeskEvent::ActionSettled(action, result));
    });
}

/// Fold one finished task into the state, spawning the refetch it asks for
fn settle(state: &mut ModerationState, event: DeskEvent, api: &ModeratorApi, tx: &UnboundedSender<DeskEvent>) {
    if let Some(generation) = state.apply_event(event) {
        debug!(generation, "refetching after accepted action");
        spawn_load(api, tx, generation);
    }
}

/// Start the background work for a key outcome. Returns true on quit.
fn dispatch(state: &mut ModerationState, outcome: KeyOutcome, api: &ModeratorApi, tx: &UnboundedSender<DeskEvent>) -> bool {
    match outcome {
        KeyOutcome::Quit => return true,
        KeyOutcome::Refresh => {
            let generation = state.begin_load();
            spawn_load(api, tx, generation);
        }
        KeyOutcome::Perform(action) => {
            debug!(action = action.name(), target = action.target_id(), "dispatching action");
            spawn_action(api, tx, action);
        }
        KeyOutcome::Nothing => {}
    }
    false
}

/// Run the moderation TUI
pub async fn run_moderation_tui(api: ModeratorApi) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(url = %api.base_url(), "moderation screen started");
    let mut state = ModerationState::new(ModerationDesk::new(api));

    // Run UI loop
    let res = run_ui_loop(&mut terminal, &mut state).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_ui_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut ModerationState,
) -> Result<()> {
    let (tx, mut rx) = unbounded_channel::<DeskEvent>();
    let api = state.desk().api().clone();

    dispatch(state, KeyOutcome::Refresh, &api, &tx);

    loop {
        // Drain finished background tasks
        while let Ok(event) = rx.try_recv() {
            settle(state, event, &api, &tx);
        }

        terminal.draw(|f| ui(f, state))?;

        // Handle input (with timeout)
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let outcome = state.handle_key(key.code);
                if dispatch(state, outcome, &api, &tx) {
                    return Ok(());
                }
            }
        }
    }
}

fn ui(f: &mut Frame, state: &ModerationState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Title
            Constraint::Length(3),  // Menu
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Footer
        ])
        .split(f.size());

    let desk = state.desk();

    // Title
    let mut title_spans = vec![Span::styled(
        "Moderator Dashboard",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if desk.is_loading() {
        title_spans.push(Span::styled("  Loading...", Style::default().fg(Color::Yellow)));
    }
    let title = Paragraph::new(Line::from(title_spans)).alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    // Menu bar
    let menu_items: Vec<Span> = DeskTab::all()
        .iter()
        .enumerate()
        .flat_map(|(i, tab)| {
            let style = if *tab == state.tab() {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let count = match tab {
                DeskTab::Pending => format!(" ({})", desk.profiles().len()),
                DeskTab::Reports => format!(" ({})", desk.reports().len()),
                DeskTab::Stats => String::new(),
            };
            vec![
                Span::styled(format!(" [{}] {}{} ", i + 1, tab.title(), count), style),
                Span::raw("  "),
            ]
        })
        .collect();
    let menu = Paragraph::new(Line::from(menu_items)).block(Block::default().borders(Borders::ALL));
    f.render_widget(menu, chunks[1]);

    match state.tab() {
        DeskTab::Pending => render_pending(f, chunks[2], state),
        DeskTab::Reports => render_reports(f, chunks[2], state),
        DeskTab::Stats => render_stats(f, chunks[2], state),
    }

    // Footer
    let (footer_text, footer_style) = match state.status() {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Error => Color::Red,
                NoticeKind::Success => Color::Green,
                NoticeKind::Info => Color::Cyan,
            };
            (notice.line(), Style::default().fg(color).add_modifier(Modifier::BOLD))
        }
        None => {
            let keys = match state.tab() {
                DeskTab::Pending => "[q] Quit  [↑↓] Select  [Enter] Details  [a] Approve  [x] Reject  [r] Refresh",
                DeskTab::Reports => "[q] Quit  [↑↓] Select  [Enter] Details  [v] Resolve  [d] Dismiss  [r] Refresh",
                DeskTab::Stats => "[q] Quit  [← →] Tab  [r] Refresh",
            };
            (keys.to_string(), Style::default().fg(Color::Gray))
        }
    };
    let footer = Paragraph::new(footer_text)
        .style(footer_style)
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);

    if state.show_detail {
        render_detail(f, state);
    }
}

fn render_pending(f: &mut Frame, area: Rect, state: &ModerationState) {
    let profiles = state.desk().profiles();

    if profiles.is_empty() {
        let empty = Paragraph::new("No profiles awaiting moderation")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Pending profiles"));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = profiles
        .iter()
        .map(|p| {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!("{}, {}", p.name, p.age),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(p.gender_label().to_string(), Style::default().fg(Color::Magenta)),
                    Span::raw("  │  "),
                    Span::styled(p.city.clone(), Style::default().fg(Color::Gray)),
                ]),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        p.username.as_deref().map(|u| format!("@{}", u)).unwrap_or_else(|| "-".to_string()),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(format!("  tg:{}", p.telegram_id), Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!("  {}", format_created_at(p.created_at.as_deref())),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
            ];
            if let Some(bio) = p.bio.as_deref() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", truncate_string(bio, 80)),
                    Style::default().fg(Color::Gray),
                )));
            }
            ListItem::new(Text::from(lines))
        })
        .collect();

    let mut list_state = state.profile_list.clone();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Pending profiles"))
        .highlight_style(Style::default().bg(Color::DarkGray));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_reports(f: &mut Frame, area: Rect, state: &ModerationState) {
    let reports = state.desk().reports();

    if reports.is_empty() {
        let empty = Paragraph::new("No open reports")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Reports"));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = reports
        .iter()
        .map(|r| {
            ListItem::new(Text::from(vec![
                Line::from(vec![
                    Span::styled(format!("#{} ", r.id), Style::default().fg(Color::Gray)),
                    Span::styled(
                        or_dash(r.reported_name.as_deref()).to_string(),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("  reported by ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        or_dash(r.reporter_name.as_deref()).to_string(),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        r.reported_telegram_id.map(|id| format!("  tg:{}", id)).unwrap_or_default(),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("  {}", format_created_at(r.created_at.as_deref())),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(vec![
                    Span::raw("  Reason: "),
                    Span::styled(truncate_string(&r.reason, 80), Style::default().fg(Color::Yellow)),
                ]),
            ]))
        })
        .collect();

    let mut list_state = state.report_list.clone();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Reports"))
        .highlight_style(Style::default().bg(Color::DarkGray));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_stats(f: &mut Frame, area: Rect, state: &ModerationState) {
    let Some(stats) = state.desk().stats() else {
        let empty = Paragraph::new("No statistics loaded")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Statistics"));
        f.render_widget(empty, area);
        return;
    };

    let total = stats.total_profiles.min(u32::MAX as u64) as u32;
    let share = |n: u64| text_bar(n.min(u32::MAX as u64) as u32, total, 20);

    let rows = vec![
        Row::new(vec![
            Cell::from("Total profiles"),
            Cell::from(stats.total_profiles.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(""),
        ]),
        Row::new(vec![
            Cell::from("Approved"),
            Cell::from(stats.approved.to_string()).style(Style::default().fg(Color::Green)),
            Cell::from(share(stats.approved)).style(Style::default().fg(Color::Green)),
        ]),
        Row::new(vec![
            Cell::from("Pending"),
            Cell::from(stats.pending.to_string()).style(Style::default().fg(Color::Yellow)),
            Cell::from(share(stats.pending)).style(Style::default().fg(Color::Yellow)),
        ]),
        Row::new(vec![
            Cell::from("Rejected"),
            Cell::from(stats.rejected.to_string()).style(Style::default().fg(Color::Red)),
            Cell::from(share(stats.rejected)).style(Style::default().fg(Color::Red)),
        ]),
        Row::new(vec![
            Cell::from("Matches"),
            Cell::from(stats.matches.to_string()).style(Style::default().fg(Color::Magenta)),
            Cell::from(""),
        ]),
        Row::new(vec![
            Cell::from("Open reports"),
            Cell::from(stats.pending_reports.to_string()).style(Style::default().fg(Color::Red)),
            Cell::from(""),
        ]),
        Row::new(vec![
            Cell::from("Likes today"),
            Cell::from(stats.likes_today.to_string()).style(Style::default().fg(Color::Cyan)),
            Cell::from(""),
        ]),
    ];

    let table = Table::new(
        rows,
        [Constraint::Length(16), Constraint::Length(10), Constraint::Min(22)],
    )
    .header(
        Row::new(vec!["Metric", "Count", "Share"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title("Statistics"));
    f.render_widget(table, area);
}

fn render_detail(f: &mut Frame, state: &ModerationState) {
    let area = f.size();
    let popup_width = area.width.min(70);
    let popup_height = area.height.min(16);
    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<12}", label), Style::default().fg(Color::Gray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ])
    };

    let desk = state.desk();
    let (title, lines) = match state.tab() {
        DeskTab::Pending => {
            let Some(p) = state.profile_list.selected().and_then(|i| desk.profiles().get(i)) else {
                return;
            };
            ("Profile", vec![
                field("Name", format!("{}, {}", p.name, p.age)),
                field("Gender", p.gender_label().to_string()),
                field("City", p.city.clone()),
                field("Username", or_dash(p.username.as_deref()).to_string()),
                field("Telegram", p.telegram_id.to_string()),
                field("Photo", or_dash(p.photo_url.as_deref()).to_string()),
                field("Created", format_created_at(p.created_at.as_deref())),
                Line::from(""),
                Line::from(or_dash(p.bio.as_deref()).to_string()),
            ])
        }
        DeskTab::Reports => {
            let Some(r) = state.report_list.selected().and_then(|i| desk.reports().get(i)) else {
                return;
            };
            ("Report", vec![
                field("Report", format!("#{} ({})", r.id, r.status)),
                field("Reporter", format!("{} (id {})", or_dash(r.reporter_name.as_deref()), r.reporter_id)),
                field("Reported", format!("{} (id {})", or_dash(r.reported_name.as_deref()), r.reported_user_id)),
                field(
                    "Telegram",
                    r.reported_telegram_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
                ),
                field("Created", format_created_at(r.created_at.as_deref())),
                Line::from(""),
                Line::from(r.reason.clone()),
            ])
        }
        DeskTab::Stats => return,
    };

    f.render_widget(Clear, popup_area);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} - [Esc] close ", title)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ModeratorProfile, Report, Stats};
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use reqwest::StatusCode;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn profile(id: i64) -> ModeratorProfile {
        ModeratorProfile {
            id,
            telegram_id: 500 + id,
            username: None,
            name: format!("User{}", id),
            age: 15,
            city: "Казань".to_string(),
            gender: "female".to_string(),
            photo_url: None,
            bio: None,
            created_at: None,
        }
    }

    fn report(id: i64) -> Report {
        Report {
            id,
            reporter_id: 1,
            reporter_name: Some("A".to_string()),
            reported_user_id: 2,
            reported_name: Some("B".to_string()),
            reported_telegram_id: None,
            reason: "spam".to_string(),
            status: "pending".to_string(),
            created_at: None,
        }
    }

    fn loaded_state() -> ModerationState {
        // No request is made: events are applied directly
        let api = ModeratorApi::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        state_on(api)
    }

    fn state_on(api: ModeratorApi) -> ModerationState {
        let mut state = ModerationState::new(ModerationDesk::new(api));
        let generation = state.begin_load();
        state.apply_event(DeskEvent::Loaded { generation, result: Ok(snapshot(&[1, 2, 3], &[10])) });
        state
    }

    fn snapshot(profile_ids: &[i64], report_ids: &[i64]) -> Snapshot {
        Snapshot {
            profiles: profile_ids.iter().copied().map(profile).collect(),
            reports: report_ids.iter().copied().map(report).collect(),
            stats: Stats {
                total_profiles: profile_ids.len() as u64,
                pending: profile_ids.len() as u64,
                ..Stats::default()
            },
        }
    }

    fn profile_ids(state: &ModerationState) -> Vec<i64> {
        state.desk().profiles().iter().map(|p| p.id).collect()
    }

    async fn mock_get(server: &mut ServerGuard, action: &str, status: usize, body: String, hits: usize) -> Mock {
        server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("action".into(), action.into()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Mocks for the three dashboard reads, each expected `hits` times
    async fn mock_dashboard(server: &mut ServerGuard, profile_ids: &[i64], hits: usize) -> Vec<Mock> {
        let profiles: Vec<_> = profile_ids
            .iter()
            .map(|id| json!({
                "id": id, "telegram_id": 500 + id, "username": null, "name": format!("User{}", id),
                "age": 15, "city": "Казань", "gender": "female",
                "photo_url": null, "bio": null, "created_at": null
            }))
            .collect();
        vec![
            mock_get(server, "pending_profiles", 200, json!({ "profiles": profiles }).to_string(), hits).await,
            mock_get(server, "reports", 200, json!({ "reports": [] }).to_string(), hits).await,
            mock_get(server, "stats", 200, json!({ "pending": profile_ids.len() }).to_string(), hits).await,
        ]
    }

    /// Feed channel events back through `settle` until the desk is idle
    async fn settle_all(
        state: &mut ModerationState,
        api: &ModeratorApi,
        tx: &UnboundedSender<DeskEvent>,
        rx: &mut UnboundedReceiver<DeskEvent>,
        events: usize,
    ) {
        for _ in 0..events {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("task did not report back")
                .expect("channel closed");
            settle(state, event, api, tx);
        }
    }

    #[test]
    fn test_load_selects_first_row() {
        let state = loaded_state();
        assert!(!state.desk().is_loading());
        assert_eq!(state.selected_profile_id(), Some(1));
        assert_eq!(state.selected_report_id(), Some(10));
    }

    #[test]
    fn test_approve_key_targets_selected_profile() {
        let mut state = loaded_state();
        state.handle_key(KeyCode::Down);
        assert_eq!(state.handle_key(KeyCode::Char('a')), KeyOutcome::Perform(ModAction::Approve(2)));
        assert_eq!(state.handle_key(KeyCode::Char('x')), KeyOutcome::Perform(ModAction::Reject(2)));
        // Report keys do nothing on the pending tab
        assert_eq!(state.handle_key(KeyCode::Char('v')), KeyOutcome::Nothing);
    }

    #[test]
    fn test_report_keys_on_reports_tab() {
        let mut state = loaded_state();
        state.handle_key(KeyCode::Char('2'));
        assert_eq!(state.tab(), DeskTab::Reports);
        assert_eq!(state.handle_key(KeyCode::Char('v')), KeyOutcome::Perform(ModAction::ResolveReport(10)));
        assert_eq!(state.handle_key(KeyCode::Char('d')), KeyOutcome::Perform(ModAction::DismissReport(10)));
        assert_eq!(state.handle_key(KeyCode::Char('a')), KeyOutcome::Nothing);
    }

    #[test]
    fn test_accepted_action_prunes_and_requests_refetch() {
        let mut state = loaded_state();
        state.handle_key(KeyCode::Down);
        state.handle_key(KeyCode::Down);

        let refetch = state.apply_event(DeskEvent::ActionSettled(ModAction::Approve(3), Ok(())));

        assert_eq!(refetch, Some(state.desk().load_generation()));
        assert!(state.desk().is_loading());
        assert_eq!(profile_ids(&state), vec![1, 2]);
        // Selection moves back inside the shorter list
        assert_eq!(state.selected_profile_id(), Some(2));
        assert_eq!(state.status().map(|n| n.kind), Some(NoticeKind::Success));
    }

    #[test]
    fn test_failed_action_keeps_list_without_refetch() {
        let mut state = loaded_state();
        let refetch = state.apply_event(DeskEvent::ActionSettled(
            ModAction::Reject(1),
            Err(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
        ));

        assert_eq!(refetch, None);
        assert!(!state.desk().is_loading());
        assert_eq!(state.desk().profiles().len(), 3);
        assert!(state.status().unwrap().is_error());
    }

    #[test]
    fn test_failed_load_keeps_data_and_shows_error() {
        let mut state = loaded_state();
        let generation = state.begin_load();
        state.apply_event(DeskEvent::Loaded { generation, result: Err(ApiError::Decode("bad".to_string())) });

        assert_eq!(state.desk().profiles().len(), 3);
        assert_eq!(state.status().map(|n| n.description.as_str()), Some("Failed to load data"));
    }

    #[test]
    fn test_last_resolved_report_clears_selection() {
        let mut state = loaded_state();
        state.apply_event(DeskEvent::ActionSettled(ModAction::DismissReport(10), Ok(())));
        assert_eq!(state.selected_report_id(), None);

        state.handle_key(KeyCode::Char('2'));
        assert_eq!(state.handle_key(KeyCode::Char('d')), KeyOutcome::Nothing);
        state.handle_key(KeyCode::Enter);
        assert!(!state.show_detail);
    }

    #[test]
    fn test_detail_popup_swallows_keys() {
        let mut state = loaded_state();
        state.handle_key(KeyCode::Enter);
        assert!(state.show_detail);
        assert_eq!(state.handle_key(KeyCode::Char('q')), KeyOutcome::Nothing);
        assert!(!state.show_detail);
        assert_eq!(state.handle_key(KeyCode::Char('q')), KeyOutcome::Quit);
    }

    #[test]
    fn test_refresh_and_tab_cycle() {
        let mut state = loaded_state();
        assert_eq!(state.handle_key(KeyCode::Char('r')), KeyOutcome::Refresh);
        state.handle_key(KeyCode::Left);
        assert_eq!(state.tab(), DeskTab::Stats);
        state.handle_key(KeyCode::Right);
        assert_eq!(state.tab(), DeskTab::Pending);
    }

    #[test]
    fn test_refetch_started_before_later_approval_cannot_restore_it() {
        let mut state = loaded_state();

        let first = state
            .apply_event(DeskEvent::ActionSettled(ModAction::Approve(1), Ok(())))
            .unwrap();
        let second = state
            .apply_event(DeskEvent::ActionSettled(ModAction::Approve(2), Ok(())))
            .unwrap();
        assert_eq!(profile_ids(&state), vec![3]);

        state.apply_event(DeskEvent::Loaded { generation: second, result: Ok(snapshot(&[3], &[10])) });
        assert!(!state.desk().is_loading());

        // The first refetch was answered before profile 2 was approved
        state.apply_event(DeskEvent::Loaded { generation: first, result: Ok(snapshot(&[2, 3], &[10])) });
        assert_eq!(profile_ids(&state), vec![3]);
        assert!(!state.desk().is_loading());
    }

    #[test]
    fn test_early_stale_load_leaves_loading_indicator() {
        let mut state = loaded_state();
        let first = state.begin_load();
        let second = state.begin_load();

        state.apply_event(DeskEvent::Loaded { generation: first, result: Ok(snapshot(&[1], &[])) });
        assert!(state.desk().is_loading());
        assert_eq!(profile_ids(&state), vec![1, 2, 3]);

        state.apply_event(DeskEvent::Loaded { generation: second, result: Ok(snapshot(&[2], &[])) });
        assert!(!state.desk().is_loading());
        assert_eq!(profile_ids(&state), vec![2]);
    }

    #[tokio::test]
    async fn test_refresh_key_loads_all_three_endpoints() {
        let mut server = Server::new_async().await;
        let mocks = mock_dashboard(&mut server, &[4, 5], 1).await;
        let api = ModeratorApi::new(server.url(), Duration::from_secs(5)).unwrap();
        let mut state = ModerationState::new(ModerationDesk::new(api.clone()));
        let (tx, mut rx) = unbounded_channel();

        let outcome = state.handle_key(KeyCode::Char('r'));
        assert!(!dispatch(&mut state, outcome, &api, &tx));
        assert!(state.desk().is_loading());
        settle_all(&mut state, &api, &tx, &mut rx, 1).await;

        for mock in &mocks {
            mock.assert_async().await;
        }
        assert!(!state.desk().is_loading());
        assert_eq!(profile_ids(&state), vec![4, 5]);
        assert_eq!(state.desk().stats().map(|s| s.pending), Some(2));
        assert_eq!(state.selected_profile_id(), Some(4));
    }

    #[tokio::test]
    async fn test_approve_posts_then_refetches_every_endpoint() {
        let mut server = Server::new_async().await;
        let post = server
            .mock("POST", "/")
            .match_query(Matcher::UrlEncoded("action".into(), "approve".into()))
            .match_body(Matcher::Json(json!({ "profile_id": 1 })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "success": true }).to_string())
            .expect(1)
            .create_async()
            .await;
        // Someone else approved profile 2 meanwhile
        let reads = mock_dashboard(&mut server, &[3], 1).await;
        let api = ModeratorApi::new(server.url(), Duration::from_secs(5)).unwrap();
        let mut state = state_on(api.clone());
        let (tx, mut rx) = unbounded_channel();

        let outcome = state.handle_key(KeyCode::Char('a'));
        assert_eq!(outcome, KeyOutcome::Perform(ModAction::Approve(1)));
        dispatch(&mut state, outcome, &api, &tx);

        // Action result, then the refetch it triggers
        settle_all(&mut state, &api, &tx, &mut rx, 2).await;

        post.assert_async().await;
        for mock in &reads {
            mock.assert_async().await;
        }
        assert_eq!(profile_ids(&state), vec![3]);
        assert!(!state.desk().is_loading());
        assert_eq!(state.status().map(|n| n.kind), Some(NoticeKind::Success));
    }

    #[tokio::test]
    async fn test_rejected_action_sends_no_reads() {
        let mut server = Server::new_async().await;
        let post = server
            .mock("POST", "/")
            .match_query(Matcher::UrlEncoded("action".into(), "reject".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "success": false }).to_string())
            .expect(1)
            .create_async()
            .await;
        let reads = mock_dashboard(&mut server, &[], 0).await;
        let api = ModeratorApi::new(server.url(), Duration::from_secs(5)).unwrap();
        let mut state = state_on(api.clone());
        let (tx, mut rx) = unbounded_channel();

        let outcome = state.handle_key(KeyCode::Char('x'));
        dispatch(&mut state, outcome, &api, &tx);
        settle_all(&mut state, &api, &tx, &mut rx, 1).await;

        post.assert_async().await;
        for mock in &reads {
            mock.assert_async().await;
        }
        assert!(rx.try_recv().is_err());
        assert_eq!(profile_ids(&state), vec![1, 2, 3]);
        assert_eq!(state.status().map(|n| n.description.as_str()), Some("Action failed"));
    }

    #[tokio::test]
    async fn test_one_failing_read_keeps_prior_data() {
        let mut server = Server::new_async().await;
        let _profiles = mock_get(&mut server, "pending_profiles", 200, json!({ "profiles": [] }).to_string(), 1).await;
        let _reports = mock_get(&mut server, "reports", 500, json!({ "error": "boom" }).to_string(), 1).await;
        let _stats = mock_get(&mut server, "stats", 200, json!({}).to_string(), 1).await;
        let api = ModeratorApi::new(server.url(), Duration::from_secs(5)).unwrap();
        let mut state = state_on(api.clone());
        let (tx, mut rx) = unbounded_channel();

        dispatch(&mut state, KeyOutcome::Refresh, &api, &tx);
        settle_all(&mut state, &api, &tx, &mut rx, 1).await;

        assert_eq!(profile_ids(&state), vec![1, 2, 3]);
        assert_eq!(state.desk().reports().len(), 1);
        assert!(!state.desk().is_loading());
        assert_eq!(state.status().map(|n| n.description.as_str()), Some("Failed to load data"));
    }

    #[test]
    fn test_quit_key_stops_dispatch() {
        let mut state = loaded_state();
        let api = state.desk().api().clone();
        let (tx, _rx) = unbounded_channel();
        assert!(dispatch(&mut state, KeyOutcome::Quit, &api, &tx));
        assert!(!dispatch(&mut state, KeyOutcome::Nothing, &api, &tx));
    }
}
