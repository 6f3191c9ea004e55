use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

use crate::config::AppConfig;
use crate::controller::{Action, Completion, Controller};
use crate::location::ConfiguredLocation;
use crate::timings::AladhanClient;
use crate::tui::events::{Event, EventQueue};
use crate::tui::theme;
use crate::tui::widgets::{date_bar, header, statusbar, timings};
use crate::utils::format::parse_date_input;
use crate::utils::hijri::hijri_string;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Timings,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    DateInput,
}

pub struct App {
    pub view: View,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>, // shown in the date popup on bad input

    pub today: NaiveDate,
    pub location_name: String,
    pub hijri_offset: i32,
    controller: Controller,
}

impl App {
    pub fn new(config: &AppConfig, controller: Controller) -> Self {
        App {
            view: View::Timings,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            today: Local::now().date_naive(),
            location_name: config.location.name.clone(),
            hijri_offset: config.display.hijri_offset,
            controller,
        }
    }

    #[cfg(test)]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn mount(&mut self) {
        self.controller.dispatch(Action::Mount);
    }

    pub fn tick(&mut self) {
        // Keep the "(Today)" marker right across midnight
        self.today = Local::now().date_naive();
    }

    pub fn on_fetched(&mut self, completion: Completion) {
        if !self.controller.complete(completion) {
            debug!("Ignored superseded fetch result");
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle actual key presses — ignore release/repeat events from some terminals
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.input_mode {
            InputMode::DateInput => self.handle_date_input(key),
            InputMode::Normal => match self.view {
                View::Timings => self.handle_timings_key(key),
                View::Help => self.handle_help_key(key),
            },
        }
    }

    fn handle_timings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.controller.dispatch(Action::PrevDay);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.controller.dispatch(Action::NextDay);
            }
            KeyCode::Char('t') => {
                self.controller.dispatch(Action::Today);
            }
            KeyCode::Char('r') => {
                self.controller.dispatch(Action::Refresh);
            }
            KeyCode::Char('g') => {
                self.input_mode = InputMode::DateInput;
                self.input_buffer = self
                    .controller
                    .store()
                    .selected()
                    .format("%Y-%m-%d")
                    .to_string();
                self.input_error = None;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                self.view = View::Timings;
            }
            _ => {}
        }
    }

    fn handle_date_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => match parse_date_input(&self.input_buffer) {
                Ok(date) => {
                    self.controller.dispatch(Action::PickDate(date));
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                    self.input_error = None;
                }
                Err(message) => {
                    self.input_error = Some(message);
                }
            },
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                if self.input_buffer.len() < 10 {
                    self.input_buffer.push(c);
                }
                self.input_error = None;
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_timings(frame);

        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }

        if self.input_mode == InputMode::DateInput {
            self.draw_date_input(frame);
        }
    }

    fn draw_timings(&self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(Block::default().style(theme::screen()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),  // header
                Constraint::Length(3),  // date bar
                Constraint::Length(11), // timings
                Constraint::Min(0),
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let store = self.controller.store();
        let selected = store.selected();
        let hijri = hijri_string(selected, self.hijri_offset);

        header::render(frame, chunks[0], &self.location_name);
        date_bar::render(frame, chunks[1], selected, self.today, hijri.as_deref());
        timings::render(frame, chunks[2], store.state());
        statusbar::render(frame, chunks[4]);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).max(12),
        }
        .intersection(area);

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("  [← / h]      ", "Previous day"),
            ("  [→ / l]      ", "Next day"),
            ("  [g]          ", "Go to a date"),
            ("  [t]          ", "Back to today"),
            ("  [r]          ", "Fetch again"),
            ("  [?]          ", "Toggle help"),
            ("  [Esc]        ", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, label) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(key, theme::accent()),
                Span::styled(label, theme::muted()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::accent())
            .style(theme::panel());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_date_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };

        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height / 2).saturating_sub(3),
            width: area.width / 2,
            height,
        }
        .intersection(area);

        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Date: ", theme::muted()),
                Span::styled(
                    self.input_buffer.as_str(),
                    theme::accent().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█", theme::highlight()), // block cursor
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  YYYY-MM-DD, then [Enter]  ·  [Esc] cancel",
                theme::muted(),
            )),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::error())));
        }

        let border_style = if self.input_error.is_some() {
            theme::error()
        } else {
            theme::highlight()
        };

        let block = Block::default()
            .title(Span::styled(" Go to Date ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(theme::panel());

        let paragraph = Paragraph::new(text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Run the TUI event loop. Fetch cycles run on `runtime` and report back
/// through the event channel.
pub fn run(runtime: Handle, config: AppConfig) -> Result<()> {
    let events = EventQueue::start(Duration::from_millis(500));

    let controller = Controller::new(
        Local::now().date_naive(),
        Arc::new(ConfiguredLocation::from_config(&config.location)),
        Arc::new(AladhanClient::from_config(&config.api)),
        runtime,
        events.completion_sink(),
    );
    let mut app = App::new(&config, controller);
    app.mount();

    let mut terminal = ratatui::init();

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| app.draw(frame))?;

            match events.next()? {
                Event::Key(key) => {
                    app.handle_key(key);
                    if app.should_quit {
                        break;
                    }
                }
                Event::Tick => app.tick(),
                Event::Fetched(completion) => app.on_fetched(completion),
            }
        }
        Ok(())
    })();

    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{CompletionSink, FetchState, PERMISSION_DENIED_MESSAGE};
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// App whose location is denied, so no request ever leaves the process.
    fn offline_app() -> (App, mpsc::UnboundedReceiver<Completion>) {
        let mut config = AppConfig::default();
        config.location.allow = false;
        config.api.base_url = "http://127.0.0.1:9".to_string();

        let (tx, rx) = mpsc::unbounded_channel();
        let sink: CompletionSink = Arc::new(move |completion| {
            let _ = tx.send(completion);
        });
        let controller = Controller::new(
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            Arc::new(ConfiguredLocation::from_config(&config.location)),
            Arc::new(AladhanClient::from_config(&config.api)),
            Handle::current(),
            sink,
        );
        (App::new(&config, controller), rx)
    }

    fn selected(app: &App) -> NaiveDate {
        app.controller().store().selected()
    }

    #[tokio::test]
    async fn arrows_move_one_day() {
        let (mut app, _rx) = offline_app();
        app.handle_key(key(KeyCode::Right));
        assert_eq!(selected(&app), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        app.handle_key(key(KeyCode::Char('h')));
        assert_eq!(selected(&app), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(app.controller().store().state(), &FetchState::Loading);
    }

    #[tokio::test]
    async fn date_popup_picks_typed_date() {
        let (mut app, _rx) = offline_app();
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.input_mode, InputMode::DateInput);
        assert_eq!(app.input_buffer, "2024-01-31");

        for _ in 0..10 {
            app.handle_key(key(KeyCode::Backspace));
        }
        for c in "2025-06-01".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(selected(&app), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[tokio::test]
    async fn bad_date_keeps_popup_open() {
        let (mut app, _rx) = offline_app();
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::DateInput);
        assert!(app.input_error.is_some());
        assert_eq!(selected(&app), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[tokio::test]
    async fn denied_location_shows_message() {
        let (mut app, mut rx) = offline_app();
        app.mount();
        let completion = rx.recv().await.unwrap();
        app.on_fetched(completion);
        assert_eq!(
            app.controller().store().state(),
            &FetchState::Error(PERMISSION_DENIED_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn escape_quits_and_ctrl_c_quits() {
        let (mut app, _rx) = offline_app();
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);

        let (mut app, _rx) = offline_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn t_returns_to_today() {
        let (mut app, _rx) = offline_app();
        app.handle_key(key(KeyCode::Char('t')));
        assert_eq!(selected(&app), Local::now().date_naive());
        assert_eq!(app.controller().store().state(), &FetchState::Loading);
    }
}
