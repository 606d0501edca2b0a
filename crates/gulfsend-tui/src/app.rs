use std::sync::mpsc;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use gulfsend_core::seed::landing_board;
use gulfsend_core::{
    ApiKeyRegistry, Clipboard, Dashboard, DashboardConfig, Notification, NotificationKind,
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};

use crate::components::key_table::KeyTable;
use crate::components::task_board::TaskBoard;

/// Which top-level view is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Board,
    Keys,
}

/// What the app is currently doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the active screen
    Normal,
    /// Typing the name of a new key
    NewKey { input: String },
    /// Renaming a key; the working name lives in the dashboard's edit state
    EditKey,
}

pub struct App {
    screen: Screen,
    mode: Mode,
    board: TaskBoard,
    keys: KeyTable,
    dashboard: Dashboard,
    toasts: mpsc::Receiver<Notification>,
    status_message: Option<Notification>,
}

impl App {
    pub fn new(
        config: DashboardConfig,
        registry: ApiKeyRegistry,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        let (tx, toasts) = mpsc::channel();
        let dashboard = Dashboard::new(config, registry, clipboard, Box::new(tx));
        Self {
            screen: Screen::Board,
            mode: Mode::Normal,
            board: TaskBoard::new(&landing_board()),
            keys: KeyTable::new(),
            dashboard,
            toasts,
            status_message: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn status_message(&self) -> Option<&Notification> {
        self.status_message.as_ref()
    }

    pub fn selected_key_id(&self) -> Option<&str> {
        self.keys
            .selected_key(self.dashboard.list())
            .map(|k| k.id.as_str())
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::NewKey { .. } | Mode::EditKey)
    }

    /// Returns true if the event loop should use a poll timeout instead of blocking.
    pub fn needs_polling(&self) -> bool {
        self.dashboard.needs_polling()
    }

    /// Apply finished clipboard writes and expired copy flags, then surface
    /// the newest toast. Called on poll timeout and after every key.
    pub fn tick(&mut self) {
        self.dashboard.pump();
        if let Some(latest) = self.toasts.try_iter().last() {
            self.status_message = Some(latest);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::NewKey { input } => self.handle_new_key(key, input),
            Mode::EditKey => self.handle_edit_key(key),
        }

        self.tick();
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Tab {
            self.screen = match self.screen {
                Screen::Board => Screen::Keys,
                Screen::Keys => Screen::Board,
            };
            return;
        }
        match self.screen {
            Screen::Board => self.handle_board(key),
            Screen::Keys => self.handle_keys(key),
        }
    }

    fn handle_board(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Some(task) = self.board.selected_task() {
                    let msg = format!("Task: {}, Status: {}", task.title, task.status.label());
                    self.status_message = Some(Notification::success(msg));
                }
            }
            _ => self.board.handle_key(key),
        }
    }

    fn handle_keys(&mut self, key: KeyEvent) {
        let selected = self
            .keys
            .selected_key(self.dashboard.list())
            .map(|k| (k.id.clone(), k.name.clone()));

        match key.code {
            KeyCode::Char('n') => {
                self.mode = Mode::NewKey {
                    input: String::new(),
                };
            }
            KeyCode::Char('v') => {
                if let Some((id, _)) = selected {
                    self.dashboard.reveal(&id);
                }
            }
            KeyCode::Char('c') => {
                if let Some((id, _)) = selected {
                    if let Err(e) = self.dashboard.copy(&id) {
                        self.status_message = Some(Notification::error(format!("Error: {e}")));
                    }
                }
            }
            KeyCode::Char('e') => {
                if let Some((id, name)) = selected {
                    self.dashboard.begin_edit(&id, &name);
                    self.mode = Mode::EditKey;
                }
            }
            KeyCode::Char('d') => {
                if let Some((id, _)) = selected {
                    self.dashboard.delete_key(&id);
                    self.keys.clamp(self.dashboard.list().len());
                }
            }
            _ => self.keys.handle_key(key, self.dashboard.list().len()),
        }
    }

    fn handle_new_key(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Enter => {
                let created = self.dashboard.create_key(&input);
                self.keys.select_last(self.dashboard.list().len());
                let label = if created.name.is_empty() {
                    "(unnamed)"
                } else {
                    created.name.as_str()
                };
                self.status_message = Some(Notification::success(format!("Created key {label}")));
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::NewKey { input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::NewKey { input };
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let mut working = self
            .dashboard
            .edit_state()
            .working_name()
            .unwrap_or_default()
            .to_string();

        match key.code {
            KeyCode::Enter => {
                self.dashboard.commit_edit();
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.dashboard.cancel_edit();
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                working.pop();
                self.dashboard.update_working_name(&working);
            }
            KeyCode::Char(c) => {
                working.push(c);
                self.dashboard.update_working_name(&working);
            }
            _ => {}
        }
    }

    //  Rendering

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        match self.screen {
            Screen::Board => self.board.render(frame, layout[1]),
            Screen::Keys => self.render_keys_screen(frame, layout[1]),
        }
        self.render_status_bar(frame, layout[2]);

        // Overlays
        match &self.mode {
            Mode::Normal => {}
            Mode::NewKey { input } => self.render_input_bar(frame, " Key name ", input, area),
            Mode::EditKey => {
                let working = self
                    .dashboard
                    .edit_state()
                    .working_name()
                    .unwrap_or_default();
                self.render_input_bar(frame, " Edit key name ", working, area)
            }
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let tab = |label: &'static str, screen: Screen| {
            if self.screen == screen {
                Span::styled(label, Style::default().fg(Color::Black).bg(Color::Cyan).bold())
            } else {
                Span::styled(label, Style::default().fg(Color::DarkGray))
            }
        };
        let title = Line::from(vec![
            Span::styled(" gulfsend ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            tab(" Board ", Screen::Board),
            Span::raw(" "),
            tab(" API Keys ", Screen::Keys),
        ]);
        frame.render_widget(title, area);
    }

    fn render_keys_screen(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let usage = self.dashboard.plan_usage();
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta))
                    .title(format!(" Current plan: {} ", self.dashboard.plan().name)),
            )
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio(usage.ratio())
            .label(usage.label());
        frame.render_widget(gauge, layout[0]);

        self.keys.render(frame, &self.dashboard, layout[1]);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let color = match msg.kind {
                NotificationKind::Success => Color::Green,
                NotificationKind::Error => Color::Red,
            };
            let line = Line::from(Span::styled(
                format!(" {}", msg.message),
                Style::default().fg(color),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = match (&self.mode, self.screen) {
            (Mode::Normal, Screen::Board) => vec![
                ("q", "quit"),
                ("Tab", "keys"),
                ("h/l", "cols"),
                ("j/k", "tasks"),
                ("Enter", "describe"),
            ],
            (Mode::Normal, Screen::Keys) => vec![
                ("q", "quit"),
                ("Tab", "board"),
                ("j/k", "keys"),
                ("n", "new"),
                ("v", "view"),
                ("c", "copy"),
                ("e", "rename"),
                ("d", "del"),
            ],
            (Mode::NewKey { .. }, _) => vec![("Enter", "create"), ("Esc", "cancel")],
            (Mode::EditKey, _) => vec![("Enter", "save"), ("Esc", "cancel")],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(
                        format!(" {key}"),
                        Style::default().fg(Color::Yellow).bold(),
                    ),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_input_bar(&self, frame: &mut Frame, label: &str, input: &str, area: Rect) {
        let height = area.height.min(3);
        let input_area = Rect {
            x: area.x,
            y: area.y + area.height - height,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, input_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(label);
        let paragraph = Paragraph::new(input).block(block);
        frame.render_widget(paragraph, input_area);
    }
}
