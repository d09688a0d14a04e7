/// Main TUI application: onboarding form, then the browse/matches/profile/help tabs

use anyhow::Result;
use chrono::{Local, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    Terminal,
};
use std::io;
use std::time::Duration;
use tracing::info;

use crate::core::models::Profile;
use crate::core::sample::sample_profiles;
use crate::core::{DemoCoinFlip, FormField, Notice, ProfileForm, SwipeSession};
use crate::screens::swipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Onboarding,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Browse,
    Matches,
    Profile,
    Help,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Browse => "Browse",
            Tab::Matches => "Mutual",
            Tab::Profile => "Profile",
            Tab::Help => "Help",
        }
    }

    pub fn all() -> &'static [Tab] {
        &[Tab::Browse, Tab::Matches, Tab::Profile, Tab::Help]
    }

    fn position(self) -> usize {
        Self::all().iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.position() + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        all[(self.position() + all.len() - 1) % all.len()]
    }
}

pub struct App {
    view: View,
    tab: Tab,
    form: ProfileForm,
    focused_field: FormField,
    my_profile: Option<Profile>,
    session: SwipeSession,
    notice: Option<Notice>,
    show_help: bool,
    should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let session = SwipeSession::new(
            sample_profiles(),
            Box::new(DemoCoinFlip::new()),
            Local::now().date_naive(),
        );
        Self::with_session(session)
    }

    pub fn with_session(session: SwipeSession) -> Self {
        Self {
            view: View::Onboarding,
            tab: Tab::Browse,
            form: ProfileForm::new(),
            focused_field: FormField::Name,
            my_profile: None,
            session,
            notice: None,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    pub fn focused_field(&self) -> FormField {
        self.focused_field
    }

    pub fn my_profile(&self) -> Option<&Profile> {
        self.my_profile.as_ref()
    }

    pub fn session(&self) -> &SwipeSession {
        &self.session
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        info!("swipe screen started");
        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        loop {
            self.session.refresh_day(Local::now().date_naive());

            terminal.draw(|f| swipe::render(f, self))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key_event) = event::read()? {
                    if key_event.kind == KeyEventKind::Press {
                        self.handle_key(key_event);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.view {
            View::Onboarding => self.handle_form_key(key_event.code),
            View::Main => self.handle_main_key(key_event.code),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                if self.my_profile.is_some() {
                    // Leave the edit without touching the saved profile
                    self.view = View::Main;
                    self.notice = None;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Enter => self.submit_form(Utc::now().timestamp_millis()),
            KeyCode::Tab | KeyCode::Down => {
                self.focused_field = self.focused_field.next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused_field = self.focused_field.prev();
            }
            KeyCode::Left | KeyCode::Right if self.focused_field == FormField::Gender => {
                self.form.toggle_gender();
            }
            KeyCode::Char(' ') if self.focused_field == FormField::Gender => {
                self.form.toggle_gender();
            }
            KeyCode::Char(c) => self.form.push_char(self.focused_field, c),
            KeyCode::Backspace => self.form.pop_char(self.focused_field),
            _ => {}
        }
    }

    /// Validate the form and, when complete, store it as "my profile"
    pub fn submit_form(&mut self, now_ms: i64) {
        match self.form.submit(now_ms) {
            Ok(profile) => {
                info!(profile_id = profile.id, "profile created, pending moderation");
                self.my_profile = Some(profile);
                self.view = View::Main;
                self.notice = Some(Notice::success(
                    "Profile sent for moderation",
                    "An administrator will check it shortly",
                ));
            }
            Err(e) => {
                self.notice = Some(Notice::error("Error", e.to_string()));
            }
        }
    }

    fn handle_main_key(&mut self, key: KeyCode) {
        // Clear notice on any key
        self.notice = None;

        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
            }
            KeyCode::Right | KeyCode::Tab => {
                self.tab = self.tab.next();
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.tab = self.tab.prev();
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.tab = Tab::all()[idx];
            }
            _ => match self.tab {
                Tab::Browse => self.handle_browse_key(key),
                Tab::Profile => {
                    if key == KeyCode::Char('e') {
                        self.view = View::Onboarding;
                        self.focused_field = FormField::Name;
                    }
                }
                Tab::Matches | Tab::Help => {}
            },
        }
    }

    fn handle_browse_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('l') | KeyCode::Enter => {
                self.notice = Some(self.session.like());
            }
            KeyCode::Char('s') | KeyCode::Char(' ') => {
                self.session.skip();
            }
            KeyCode::Char('r') => {
                self.notice = Some(self.session.report());
            }
            _ => {}
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
