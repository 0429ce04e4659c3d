//! Read-only listing screen.

use crate::app::Action;
use crate::components::Component;
use crate::db::Registry;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use tracing::warn;

const ROW_LIST: usize = 0;
const BACK_BUTTON: usize = 1;

/// Fetches the rows to display, one `String` per column.
pub type Load = fn(&Registry) -> Result<Vec<Vec<String>>>;

pub struct TableView {
    title: &'static str,
    columns: &'static [(&'static str, u16)],
    load: Load,
    rows: Vec<Vec<String>>,
    state: TableState,
    error_message: Option<String>,
    show_details: bool,
    focus_index: usize,
}

impl TableView {
    /// `columns` pairs each header with its width in percent.
    pub fn new(title: &'static str, columns: &'static [(&'static str, u16)], load: Load) -> Self {
        Self {
            title,
            columns,
            load,
            rows: Vec::new(),
            state: TableState::default(),
            error_message: None,
            show_details: false,
            focus_index: ROW_LIST,
        }
    }

    fn refresh(&mut self, registry: &Registry) {
        match (self.load)(registry) {
            Ok(rows) => {
                self.rows = rows;
                if self.rows.is_empty() {
                    self.state.select(None);
                } else {
                    let selection = self.state.selected().unwrap_or(0).min(self.rows.len() - 1);
                    self.state.select(Some(selection));
                }
                self.error_message = None;
            }
            Err(e) => {
                warn!(table = self.title, error = %e, "listing failed");
                self.error_message = Some(format!("Failed to load {}: {e}", self.title));
            }
        }
    }

    fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.rows.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    fn select_previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.rows.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn selected_row(&self) -> Option<&Vec<String>> {
        self.state.selected().and_then(|i| self.rows.get(i))
    }
}

impl Component for TableView {
    fn handle_input(&mut self, key: KeyEvent, registry: &mut Registry) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => self.focus_index = 1 - self.focus_index,
            KeyCode::Down => {
                if self.focus_index == ROW_LIST {
                    self.select_next();
                }
            }
            KeyCode::Up => {
                if self.focus_index == ROW_LIST {
                    self.select_previous();
                }
            }
            KeyCode::Enter => {
                if self.focus_index == BACK_BUTTON {
                    return Ok(Some(Action::Back));
                }
                if self.selected_row().is_some() {
                    self.show_details = !self.show_details;
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.refresh(registry),
            KeyCode::Char('b') | KeyCode::Char('B') => return Ok(Some(Action::Back)),
            KeyCode::Esc => {
                if self.show_details {
                    self.show_details = false;
                } else {
                    return Ok(Some(Action::Back));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn on_open(&mut self, registry: &Registry) -> Result<()> {
        self.refresh(registry);
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 16, 28))),
            area,
        );

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Table
                Constraint::Length(4), // Details or help
                Constraint::Length(2), // Back
                Constraint::Length(1), // Error
            ])
            .margin(1)
            .split(area);

        let header_block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Rgb(75, 75, 120)))
            .style(Style::default().bg(Color::Rgb(16, 16, 28)));
        frame.render_widget(header_block, layout[0]);

        let title = Paragraph::new(format!("🏥 {}", self.title.to_uppercase()))
            .style(
                Style::default()
                    .fg(Color::Rgb(230, 230, 250))
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);

        let header = Row::new(self.columns.iter().map(|(name, _)| {
            Cell::from(*name).style(Style::default().fg(Color::Rgb(230, 230, 250)))
        }))
        .style(Style::default().bg(Color::Rgb(26, 26, 36)))
        .bottom_margin(1);

        let rows = self
            .rows
            .iter()
            .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.as_str()))));

        let highlight = if self.focus_index == ROW_LIST {
            Style::default()
                .bg(Color::Rgb(40, 40, 65))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(Color::Rgb(30, 30, 45))
                .add_modifier(Modifier::BOLD)
        };

        let table = Table::new(
            rows,
            self.columns
                .iter()
                .map(|(_, width)| Constraint::Percentage(*width)),
        )
        .header(header)
        .block(
            Block::default()
                .title(format!(" {} ({}) ", self.title, self.rows.len()))
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(75, 75, 120)))
                .style(Style::default().bg(Color::Rgb(22, 22, 35))),
        )
        .row_highlight_style(highlight)
        .highlight_symbol(if self.focus_index == ROW_LIST { "► " } else { "  " });

        frame.render_stateful_widget(table, layout[1], &mut self.state.clone());

        match self.selected_row().filter(|_| self.show_details) {
            Some(row) => {
                let details = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|((name, _), value)| format!("{name}: {value}"))
                    .collect::<Vec<_>>()
                    .join(" | ");
                let details_widget = Paragraph::new(details)
                    .style(Style::default().fg(Color::Rgb(200, 200, 220)))
                    .block(
                        Block::default()
                            .title(" Details ")
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded)
                            .border_style(Style::default().fg(Color::Rgb(75, 75, 120))),
                    )
                    .wrap(Wrap { trim: true });
                frame.render_widget(details_widget, layout[2]);
            }
            None => {
                let empty = if self.rows.is_empty() { "Nothing recorded yet. " } else { "" };
                let help = Paragraph::new(format!(
                    "{empty}↑↓: Navigate | Enter: View Details | R: Refresh | Tab: Focus | Esc: Back"
                ))
                .style(Style::default().fg(Color::Rgb(140, 140, 170)))
                .alignment(Alignment::Center);
                frame.render_widget(help, layout[2]);
            }
        }

        let (back_text, back_style) = if self.focus_index == BACK_BUTTON {
            (
                "► Back ◄",
                Style::default()
                    .fg(Color::Rgb(129, 199, 245))
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("  Back  ", Style::default().fg(Color::Rgb(180, 180, 200)))
        };
        frame.render_widget(
            Paragraph::new(back_text)
                .style(back_style)
                .alignment(Alignment::Center),
            layout[3],
        );

        if let Some(error) = &self.error_message {
            frame.render_widget(
                Paragraph::new(error.as_str())
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .alignment(Alignment::Center),
                layout[4],
            );
        }
    }
}
