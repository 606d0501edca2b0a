use crossterm::event::{KeyCode, KeyEvent};
use gulfsend_core::{ApiKey, Dashboard};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

pub const EMPTY_PLACEHOLDER: &str = "No API keys found. Create your first key to get started.";

/// Cursor over the dashboard's key list.
#[derive(Debug, Default)]
pub struct KeyTable {
    selected: usize,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_key<'a>(&self, keys: &'a [ApiKey]) -> Option<&'a ApiKey> {
        keys.get(self.selected)
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the cursor on a row after the list shrinks.
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, len: usize) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('g') => self.selected = 0,
            KeyCode::Char('G') => self.select_last(len),
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
        let block = Block::default()
            .title(" API Keys ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let keys = dashboard.list();
        if keys.is_empty() {
            let placeholder = Paragraph::new(EMPTY_PLACEHOLDER)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let header = Row::new(vec!["Name", "Usage", "Key", "Options"])
            .style(Style::default().fg(Color::Yellow).bold());

        let rows: Vec<Row> = keys
            .iter()
            .map(|key| {
                let secret_style = if dashboard.is_revealed(&key.id) {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let copied = if dashboard.is_copied(&key.id) {
                    Span::styled("✓ copied", Style::default().fg(Color::Green))
                } else {
                    Span::raw("")
                };
                Row::new(vec![
                    Cell::from(key.name.as_str()).style(Style::default().bold()),
                    Cell::from(key.usage.to_string()),
                    Cell::from(dashboard.display_secret(key)).style(secret_style),
                    Cell::from(copied),
                ])
            })
            .collect();

        let widths = [
            Constraint::Percentage(25),
            Constraint::Length(7),
            Constraint::Min(30),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(table: &mut KeyTable, code: KeyCode, len: usize) {
        table.handle_key(KeyEvent::new(code, KeyModifiers::NONE), len);
    }

    #[test]
    fn navigation_is_bounded() {
        let mut table = KeyTable::new();
        press(&mut table, KeyCode::Char('k'), 3);
        assert_eq!(table.selected_index(), 0);
        press(&mut table, KeyCode::Char('j'), 3);
        press(&mut table, KeyCode::Down, 3);
        press(&mut table, KeyCode::Char('j'), 3);
        assert_eq!(table.selected_index(), 2);
        press(&mut table, KeyCode::Char('g'), 3);
        assert_eq!(table.selected_index(), 0);
        press(&mut table, KeyCode::Char('G'), 3);
        assert_eq!(table.selected_index(), 2);
    }

    #[test]
    fn clamp_after_shrink() {
        let mut table = KeyTable::new();
        table.select_last(5);
        table.clamp(3);
        assert_eq!(table.selected_index(), 2);
        table.clamp(0);
        assert_eq!(table.selected_index(), 0);
    }
}
