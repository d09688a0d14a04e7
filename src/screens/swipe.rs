/// Swipe screen - onboarding form and the Browse/Mutual/Profile/Help tabs

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Tab, View};
use crate::core::models::{ModerationStatus, Profile};
use crate::core::{FormField, Notice, NoticeKind};
use crate::utils::{initial, or_dash, text_bar, truncate_string, DAILY_LIKE_LIMIT, MAX_AGE_HINT, MIN_AGE_HINT};

pub fn render(frame: &mut Frame, app: &App) {
    match app.view() {
        View::Onboarding => render_onboarding(frame, app),
        View::Main => render_main(frame, app),
    }
}

fn notice_style(notice: &Notice) -> Style {
    let color = match notice.kind {
        NoticeKind::Info => Color::Cyan,
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn status_color(status: ModerationStatus) -> Color {
    match status {
        ModerationStatus::Pending => Color::Yellow,
        ModerationStatus::Approved => Color::Green,
        ModerationStatus::Rejected => Color::Red,
    }
}

fn render_onboarding(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Title
            Constraint::Min(0),     // Form
            Constraint::Length(3),  // Footer
        ])
        .split(frame.size());

    let heading = if app.my_profile().is_some() { "Edit profile" } else { "Create profile" };
    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "💜 TeenMatch",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(heading, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let form = app.form();
    let mut lines = Vec::new();
    for field in FormField::all() {
        let focused = *field == app.focused_field();
        let label_style = if focused {
            Style::default().fg(Color::Black).bg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let value = form.value(*field);
        let value_span = if *field == FormField::Gender {
            Span::styled(
                format!("< {} >", value),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )
        } else if value.is_empty() {
            Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        } else {
            Span::styled(value.to_string(), Style::default().fg(Color::White))
        };

        let mut spans = vec![
            Span::styled(format!(" {:<14}", field.label()), label_style),
            Span::raw("  "),
            value_span,
        ];
        if focused && *field != FormField::Gender {
            spans.push(Span::styled("█", Style::default().fg(Color::Magenta)));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format!(
            "After submission the profile goes to moderation. Ages {}-{}.",
            MIN_AGE_HINT, MAX_AGE_HINT
        ),
        Style::default().fg(Color::DarkGray),
    )));

    let form_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Profile "))
        .wrap(Wrap { trim: false });
    frame.render_widget(form_widget, chunks[1]);

    let (footer_text, footer_style) = match app.notice() {
        Some(notice) => (notice.line(), notice_style(notice)),
        None => {
            let esc = if app.my_profile().is_some() { "[Esc] Cancel" } else { "[Esc] Quit" };
            (
                format!("[Tab/↑↓] Field | [Space/← →] Gender | [Enter] Submit | {}", esc),
                Style::default(),
            )
        }
    };

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(footer_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}

fn render_main(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title + badges
            Constraint::Length(3),  // Menu
            Constraint::Min(0),     // Content
            Constraint::Length(3),  // Footer
        ])
        .split(frame.size());

    let budget = app.session().budget();
    let mut header = vec![
        Span::styled(
            "💜 TeenMatch",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Likes: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}/{}", budget.remaining(), budget.limit()),
            Style::default()
                .fg(if budget.remaining() == 0 { Color::Red } else { Color::White })
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(profile) = app.my_profile() {
        header.push(Span::raw(" | "));
        header.push(Span::styled(
            profile.status.badge(),
            Style::default().fg(status_color(profile.status)),
        ));
    }
    if app.session().is_simulated() {
        header.push(Span::raw(" | "));
        header.push(Span::styled("demo matching", Style::default().fg(Color::DarkGray)));
    }

    let title = Paragraph::new(Line::from(header))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    // Menu bar
    let menu_items: Vec<Span> = Tab::all()
        .iter()
        .enumerate()
        .flat_map(|(i, tab)| {
            let style = if *tab == app.tab() {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let label = if *tab == Tab::Matches {
                format!(" [{}] {} ({}) ", i + 1, tab.title(), app.session().mutual_matches().len())
            } else {
                format!(" [{}] {} ", i + 1, tab.title())
            };

            vec![Span::styled(label, style), Span::raw("  ")]
        })
        .collect();

    let menu = Paragraph::new(Line::from(menu_items))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(menu, chunks[1]);

    match app.tab() {
        Tab::Browse => render_browse(frame, chunks[2], app),
        Tab::Matches => render_matches(frame, chunks[2], app),
        Tab::Profile => render_profile(frame, chunks[2], app.my_profile()),
        Tab::Help => render_help_tab(frame, chunks[2]),
    }

    let (footer_text, footer_style) = match app.notice() {
        Some(notice) => (notice.line(), notice_style(notice)),
        None => {
            let keys = match app.tab() {
                Tab::Browse => "[l]ike | [s]kip | [r]eport | [← →] Tab | [?] Help | [q]uit",
                Tab::Matches => "[← →] Tab | [?] Help | [q]uit",
                Tab::Profile => "[e]dit profile | [← →] Tab | [?] Help | [q]uit",
                Tab::Help => "[← →] Tab | [?] Help | [q]uit",
            };
            (keys.to_string(), Style::default())
        }
    };

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(footer_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[3]);

    if app.show_help() {
        render_help_overlay(frame);
    }
}

fn render_browse(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let candidate = session.current();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),     // Card
            Constraint::Length(3),  // Daily likes gauge
        ])
        .split(area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", initial(&candidate.name)),
                Style::default().fg(Color::Black).bg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{}, {}", candidate.name, candidate.age),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("📍 ", Style::default()),
            Span::styled(candidate.city.clone(), Style::default().fg(Color::Gray)),
        ]),
        Line::from(""),
    ];

    if let Some(bio) = candidate.bio.as_deref() {
        lines.push(Line::from(Span::raw(bio.to_string())));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Photo: ", Style::default().fg(Color::Gray)),
        Span::styled(truncate_string(&candidate.photo, 60), Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            text_bar(session.index() as u32 + 1, session.candidates().len() as u32, 20),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!(" {}/{}", session.index() + 1, session.candidates().len()),
            Style::default().fg(Color::Gray),
        ),
    ]));

    let card = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Browse "))
        .wrap(Wrap { trim: true });
    frame.render_widget(card, chunks[0]);

    let budget = session.budget();
    let ratio = session.progress();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Likes used today "))
        .gauge_style(Style::default().fg(if budget.remaining() == 0 { Color::Red } else { Color::Magenta }))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{} / {}", budget.used(), budget.limit()));
    frame.render_widget(gauge, chunks[1]);
}

fn render_matches(frame: &mut Frame, area: Rect, app: &App) {
    let mutual = app.session().mutual_matches();

    if mutual.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No mutual likes yet", Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                "Keep browsing profiles!",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Mutual "));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = mutual
        .iter()
        .map(|(m, profile)| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", initial(&profile.name)),
                        Style::default().fg(Color::Black).bg(Color::Magenta),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format!("{}, {}", profile.name, profile.age),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        or_dash(m.username.as_deref()).to_string(),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw("  "),
                    Span::styled("[m] Message", Style::default().fg(Color::DarkGray)),
                ]),
                Line::from(Span::styled(
                    format!("     {}", profile.city),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(" Mutual ({}) ", mutual.len())));
    frame.render_widget(list, area);
}

fn render_profile(frame: &mut Frame, area: Rect, profile: Option<&Profile>) {
    let Some(profile) = profile else {
        let empty = Paragraph::new("No profile yet")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Profile "));
        frame.render_widget(empty, area);
        return;
    };

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", label), Style::default().fg(Color::Gray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ])
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", initial(&profile.name)),
                Style::default().fg(Color::Black).bg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{}, {}", profile.name, profile.age),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        row("City", profile.city.clone()),
        row("Gender", profile.gender.label().to_string()),
        row("Photo", truncate_string(&profile.photo, 60)),
    ];
    if let Some(bio) = profile.bio.as_deref() {
        lines.push(row("About", bio.to_string()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Status    ", Style::default().fg(Color::Gray)),
        Span::styled(
            profile.status.description(),
            Style::default().fg(status_color(profile.status)).add_modifier(Modifier::BOLD),
        ),
    ]));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" My profile "))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_help_tab(frame: &mut Frame, area: Rect) {
    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
    };

    let lines = vec![
        heading("How it works"),
        Line::from("  Like the profiles you find interesting. When the like is mutual you"),
        Line::from("  see their username and can start a conversation."),
        Line::from(""),
        heading("Rules"),
        Line::from(format!("  Ages {}-{} only. Be polite.", MIN_AGE_HINT, MAX_AGE_HINT)),
        Line::from(format!("  {} likes per day, renewed every 24 hours.", DAILY_LIKE_LIMIT)),
        Line::from(""),
        heading("Moderation"),
        Line::from("  Every new or edited profile is checked by a moderator before others"),
        Line::from("  can see it. The badge in the header shows where yours stands."),
        Line::from(""),
        heading("Reports"),
        Line::from("  Press [r] on a profile that breaks the rules. Moderators review"),
        Line::from("  every report."),
        Line::from(""),
        heading("Safety"),
        Line::from("  Never share your address, school or phone number."),
        Line::from("  Do not meet strangers alone. Tell an adult if something feels wrong."),
        Line::from(""),
        Line::from(Span::styled(
            "  Questions? Contact support through the bot.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = frame.size();
    let popup_width = area.width.min(64);
    let popup_height = area.height.min(18);
    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    let section = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
    };

    let help_text = vec![
        Line::from(Span::styled(
            "TeenMatch - Keyboard Shortcuts",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Navigation:"),
        Line::from("  [1-4]          Jump to tab"),
        Line::from("  [← →] / [Tab]  Previous/Next tab"),
        Line::from("  [?] / [F1]     Toggle this help"),
        Line::from("  [q]            Quit"),
        Line::from(""),
        section("Browse:"),
        Line::from("  [l] / [Enter]  Like"),
        Line::from("  [s] / [Space]  Skip"),
        Line::from("  [r]            Report"),
        Line::from(""),
        section("Profile:"),
        Line::from("  [e]            Edit and resubmit for moderation"),
        Line::from(""),
        Line::from(Span::styled(
            "Press [?] or [Esc] to close this help",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
    ];

    frame.render_widget(Clear, popup_area);

    let help_widget = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(Span::styled(" Help ", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(help_widget, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample::sample_profiles;
    use crate::core::swipe::MockMatchDecider;
    use crate::core::SwipeSession;
    use chrono::Local;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn onboarded_app() -> App {
        let mut decider = MockMatchDecider::new();
        decider.expect_is_mutual().return_const(true);
        decider.expect_is_simulated().return_const(true);
        let session = SwipeSession::new(sample_profiles(), Box::new(decider), Local::now().date_naive());
        let mut app = App::with_session(session);
        for (i, text) in ["Ivan", "16", "Kazan", "", "https://example.com/i.jpg"].iter().enumerate() {
            for c in text.chars() {
                app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
            }
            if i < 4 {
                app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
            }
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        app
    }

    #[test]
    fn test_onboarding_renders_placeholders() {
        let app = App::with_session(SwipeSession::new(
            sample_profiles(),
            Box::new(crate::core::DemoCoinFlip::new()),
            Local::now().date_naive(),
        ));
        let screen = draw(&app);
        assert!(screen.contains("Create profile"));
        assert!(screen.contains("What's your name?"));
    }

    #[test]
    fn test_main_header_shows_likes_and_badge() {
        let app = onboarded_app();
        let screen = draw(&app);
        assert!(screen.contains("15/15"));
        assert!(screen.contains("On moderation"));
        assert!(screen.contains("demo matching"));
    }

    #[test]
    fn test_mutual_tab_lists_username() {
        let mut app = onboarded_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE));
        let screen = draw(&app);
        assert!(screen.contains("Mutual (1)"));
        assert!(screen.contains("14/15"));
        assert!(screen.contains("@алексей"));
    }
}
