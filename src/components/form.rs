//! Generic data-entry form.
//!
//! Every registry operation is driven through one of these: a column of text
//! fields, a Submit and a Back button, a status line whose messages expire
//! after five seconds, and an output panel for whatever the operation
//! reports back.

use crate::app::Action;
use crate::components::Component;
use crate::db::Registry;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const MESSAGE_TTL: Duration = Duration::from_secs(5);

/// What a successful submission shows: a status message and optional detail
/// lines for the output panel.
#[derive(Debug)]
pub struct Outcome {
    pub message: String,
    pub details: Vec<String>,
}

impl Outcome {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Runs the operation with the field values, in field order.
pub type Submit = fn(&mut Registry, &[String]) -> Result<Outcome>;

pub struct Field {
    label: &'static str,
    hint: &'static str,
    required: bool,
    value: String,
}

impl Field {
    pub fn required(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            required: true,
            value: String::new(),
        }
    }

    pub fn optional(label: &'static str, hint: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(label, hint)
        }
    }
}

pub struct Form {
    title: &'static str,
    fields: Vec<Field>,
    submit: Submit,
    focus_index: usize,
    output: Vec<String>,
    error_message: Option<String>,
    error_timer: Option<Instant>,
    success_message: Option<String>,
    success_timer: Option<Instant>,
}

impl Form {
    pub fn new(title: &'static str, fields: Vec<Field>, submit: Submit) -> Self {
        Self {
            title,
            fields,
            submit,
            focus_index: 0,
            output: Vec::new(),
            error_message: None,
            error_timer: None,
            success_message: None,
            success_timer: None,
        }
    }

    fn submit_index(&self) -> usize {
        self.fields.len()
    }

    fn back_index(&self) -> usize {
        self.fields.len() + 1
    }

    fn focused_field(&mut self) -> Option<&mut Field> {
        self.fields.get_mut(self.focus_index)
    }

    fn set_error(&mut self, message: String) {
        self.clear_success();
        self.error_message = Some(message);
        self.error_timer = Some(Instant::now());
    }

    fn clear_error(&mut self) {
        self.error_message = None;
        self.error_timer = None;
    }

    fn set_success(&mut self, message: String) {
        self.clear_error();
        self.success_message = Some(message);
        self.success_timer = Some(Instant::now());
    }

    fn clear_success(&mut self) {
        self.success_message = None;
        self.success_timer = None;
    }

    fn check_timeouts(&mut self) {
        if self.error_timer.is_some_and(|t| t.elapsed() > MESSAGE_TTL) {
            self.clear_error();
        }
        if self.success_timer.is_some_and(|t| t.elapsed() > MESSAGE_TTL) {
            self.clear_success();
        }
    }

    fn run_submit(&mut self, registry: &mut Registry) {
        if let Some(missing) = self
            .fields
            .iter()
            .find(|f| f.required && f.value.trim().is_empty())
        {
            let message = format!("{} cannot be empty", missing.label);
            self.set_error(message);
            return;
        }

        let values: Vec<String> = self.fields.iter().map(|f| f.value.clone()).collect();
        match (self.submit)(registry, &values) {
            Ok(outcome) => {
                info!(form = self.title, "form submitted");
                for field in &mut self.fields {
                    field.value.clear();
                }
                self.focus_index = 0;
                self.output = outcome.details;
                self.set_success(outcome.message);
            }
            Err(e) => {
                warn!(form = self.title, error = %e, "form rejected");
                self.set_error(format!("{e:#}"));
            }
        }
    }

    fn field_count_with_buttons(&self) -> usize {
        self.fields.len() + 2
    }
}

impl Component for Form {
    fn handle_input(&mut self, key: KeyEvent, registry: &mut Registry) -> Result<Option<Action>> {
        self.check_timeouts();
        match key.code {
            KeyCode::Char(c) => {
                if let Some(field) = self.focused_field() {
                    field.value.push(c);
                    self.clear_error();
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.focused_field() {
                    field.value.pop();
                    self.clear_error();
                }
            }
            KeyCode::Tab => {
                self.focus_index = if self.focus_index < self.submit_index() {
                    self.submit_index()
                } else if self.focus_index == self.submit_index() {
                    self.back_index()
                } else {
                    0
                };
            }
            KeyCode::Down => {
                self.focus_index = (self.focus_index + 1) % self.field_count_with_buttons();
            }
            KeyCode::Up => {
                let total = self.field_count_with_buttons();
                self.focus_index = (self.focus_index + total - 1) % total;
            }
            KeyCode::Esc => return Ok(Some(Action::Back)),
            KeyCode::Enter => {
                if self.focus_index == self.back_index() {
                    return Ok(Some(Action::Back));
                } else if self.focus_index == self.submit_index() {
                    self.run_submit(registry);
                } else {
                    self.focus_index += 1;
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn on_tick(&mut self) {
        self.check_timeouts();
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 16, 28))),
            area,
        );

        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(12),
                Constraint::Length(1),
                Constraint::Length(5),
            ])
            .margin(1)
            .split(area);

        let header = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Rgb(75, 75, 120)))
            .style(Style::default().bg(Color::Rgb(16, 16, 28)));
        frame.render_widget(header, main_layout[0]);

        let title = Paragraph::new(format!("🏥 {}", self.title.to_uppercase()))
            .style(
                Style::default()
                    .fg(Color::Rgb(230, 230, 250))
                    .add_modifier(Modifier::BOLD)
                    .bg(Color::Rgb(16, 16, 28)),
            )
            .alignment(Alignment::Center);
        frame.render_widget(title, main_layout[0]);

        let body_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .spacing(1)
            .split(main_layout[1]);

        self.render_fields(frame, body_layout[0]);
        self.render_output(frame, body_layout[1]);

        let status = if let Some(success) = &self.success_message {
            Paragraph::new(format!("✓ {success}")).style(
                Style::default()
                    .fg(Color::Rgb(140, 219, 140))
                    .add_modifier(Modifier::BOLD),
            )
        } else if let Some(error) = &self.error_message {
            Paragraph::new(format!("⚠️ {error}")).style(
                Style::default()
                    .fg(Color::Rgb(255, 100, 100))
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Paragraph::new("")
        };
        frame.render_widget(
            status
                .alignment(Alignment::Center)
                .bg(Color::Rgb(16, 16, 28)),
            main_layout[2],
        );

        let footer_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(1),
            ])
            .split(main_layout[3]);

        frame.render_widget(
            button(
                "Submit",
                self.focus_index == self.submit_index(),
                Color::Rgb(140, 219, 140),
            ),
            footer_layout[0],
        );
        frame.render_widget(
            button(
                "Back",
                self.focus_index == self.back_index(),
                Color::Rgb(129, 199, 245),
            ),
            footer_layout[1],
        );

        let help = Paragraph::new(
            "↑↓: Switch Fields | Tab: Jump to Buttons | Enter: Next / Submit | Esc: Back | Ctrl+Q: Quit",
        )
        .style(Style::default().fg(Color::Rgb(140, 140, 170)))
        .alignment(Alignment::Center);
        frame.render_widget(help, footer_layout[2]);
    }
}

impl Form {
    fn render_fields(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(75, 75, 120)))
            .style(Style::default().bg(Color::Rgb(22, 22, 35)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                std::iter::once(Constraint::Length(1))
                    .chain(self.fields.iter().map(|_| Constraint::Length(3)))
                    .chain(std::iter::once(Constraint::Min(0))),
            )
            .margin(1)
            .split(inner);

        frame.render_widget(
            Paragraph::new("● * marks required fields").style(
                Style::default()
                    .fg(Color::Rgb(250, 250, 110))
                    .add_modifier(Modifier::BOLD),
            ),
            rows[0],
        );

        for (idx, field) in self.fields.iter().enumerate() {
            let focused = self.focus_index == idx;
            let (label, label_style) = if field.required {
                (
                    format!(" {}* ", field.label),
                    Style::default().fg(Color::Rgb(230, 230, 250)),
                )
            } else {
                (
                    format!(" {} ", field.label),
                    Style::default().fg(Color::Rgb(180, 180, 200)),
                )
            };

            // Empty, unfocused fields show their hint.
            let content = if field.value.is_empty() && !focused {
                Span::styled(field.hint, Style::default().fg(Color::Rgb(100, 100, 130)))
            } else {
                Span::styled(
                    field.value.as_str(),
                    Style::default().fg(Color::Rgb(220, 220, 240)),
                )
            };

            let input = Paragraph::new(Line::from(content)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(Span::styled(label, label_style))
                    .border_style(if focused {
                        Style::default().fg(Color::Rgb(250, 250, 110))
                    } else {
                        Style::default().fg(Color::Rgb(140, 140, 200))
                    })
                    .style(Style::default().bg(Color::Rgb(26, 26, 36))),
            );
            frame.render_widget(input, rows[idx + 1]);
        }
    }

    fn render_output(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .output
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect();
        let output = Paragraph::new(lines)
            .style(Style::default().fg(Color::Rgb(200, 200, 220)))
            .block(
                Block::default()
                    .title(" Output ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Rgb(75, 75, 120)))
                    .style(Style::default().bg(Color::Rgb(22, 22, 35)))
                    .padding(Padding::horizontal(1)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(output, area);
    }
}

fn button(label: &str, focused: bool, accent: Color) -> Paragraph<'static> {
    let (text, style) = if focused {
        (
            format!("► {label} ◄"),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!("  {label}  "),
            Style::default().fg(Color::Rgb(180, 180, 200)),
        )
    };
    Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
}
