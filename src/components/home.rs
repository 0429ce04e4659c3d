use crate::app::{Action, Screen};
use crate::components::Component;
use crate::db::Registry;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
};

/// Feature groups with their sub-menu entries.
const MENU: &[(&str, &str, &[(&str, Screen)])] = &[
    (
        "📋",
        "Patient Management",
        &[
            ("Register Patient", Screen::PatientRegister),
            ("List Patients", Screen::PatientList),
        ],
    ),
    (
        "👥",
        "Staff Scheduling",
        &[
            ("Add Medical Staff", Screen::StaffAdd),
            ("List Staff", Screen::StaffList),
            ("List Doctors", Screen::DoctorList),
        ],
    ),
    (
        "📅",
        "Appointments",
        &[
            ("Schedule Appointment", Screen::AppointmentSchedule),
            ("Doctor's Schedule", Screen::DoctorSchedule),
            ("All Appointments", Screen::AppointmentList),
        ],
    ),
    (
        "🛏",
        "Rooms & Discharge",
        &[
            ("Assign Room", Screen::RoomAssign),
            ("Discharge Patient", Screen::Discharge),
            ("Emergency Admission", Screen::EmergencyAdmission),
            ("Room Occupancy", Screen::RoomOccupancy),
        ],
    ),
    (
        "📦",
        "Medical Records",
        &[
            ("Create Medical Record", Screen::RecordCreate),
            ("Patient Report", Screen::PatientReport),
        ],
    ),
    (
        "💰",
        "Billing & Finance",
        &[
            ("Process Billing", Screen::BillingProcess),
            ("Treatment Cost Estimate", Screen::TreatmentCost),
            ("Billing History", Screen::BillingHistory),
        ],
    ),
    (
        "📊",
        "Reports & Analytics",
        &[("Hospital Efficiency", Screen::Efficiency)],
    ),
    (
        "💊",
        "Pharmacy",
        &[
            ("Stock Medication", Screen::MedicationStock),
            ("Medication Inventory", Screen::MedicationList),
        ],
    ),
];

pub struct Home {
    /// 0 = menu panels, 1 = Exit button.
    selection_mode: usize,
    show_exit_dialog: bool,
    exit_dialog_selected: usize,
    active_panel: usize,
    selected_feature_index: usize,
    submenu_states: Vec<ListState>,
    bed_summary: Option<String>,
}

impl Home {
    pub fn new() -> Self {
        let submenu_states = MENU
            .iter()
            .map(|_| ListState::default().with_selected(Some(0)))
            .collect();

        Self {
            selection_mode: 0,
            show_exit_dialog: false,
            exit_dialog_selected: 0,
            active_panel: 0,
            selected_feature_index: 0,
            submenu_states,
            bed_summary: None,
        }
    }

    fn submenu(&self) -> &'static [(&'static str, Screen)] {
        MENU[self.selected_feature_index].2
    }

    fn move_selection(&mut self, down: bool) {
        if self.active_panel == 0 {
            let len = MENU.len();
            self.selected_feature_index = if down {
                (self.selected_feature_index + 1) % len
            } else {
                (self.selected_feature_index + len - 1) % len
            };
        } else {
            let len = self.submenu().len();
            let state = &mut self.submenu_states[self.selected_feature_index];
            let i = state.selected().unwrap_or(0);
            state.select(Some(if down { (i + 1) % len } else { (i + len - 1) % len }));
        }
    }

    fn open_exit_dialog(&mut self) {
        self.show_exit_dialog = true;
        self.exit_dialog_selected = 1;
    }

    fn handle_exit_dialog_input(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                self.exit_dialog_selected = 1 - self.exit_dialog_selected;
            }
            KeyCode::Enter => {
                self.show_exit_dialog = false;
                if self.exit_dialog_selected == 0 {
                    return Some(Action::Quit);
                }
            }
            KeyCode::Esc => self.show_exit_dialog = false,
            _ => {}
        }
        None
    }
}

impl Component for Home {
    fn handle_input(&mut self, key: KeyEvent, _registry: &mut Registry) -> Result<Option<Action>> {
        if self.show_exit_dialog {
            return Ok(self.handle_exit_dialog_input(key));
        }

        match key.code {
            KeyCode::Tab => self.selection_mode = (self.selection_mode + 1) % 2,
            KeyCode::Left if self.selection_mode == 0 => self.active_panel = 0,
            KeyCode::Right if self.selection_mode == 0 => self.active_panel = 1,
            KeyCode::Up if self.selection_mode == 0 => self.move_selection(false),
            KeyCode::Down if self.selection_mode == 0 => self.move_selection(true),
            KeyCode::Enter => {
                if self.selection_mode == 1 {
                    self.open_exit_dialog();
                } else if self.active_panel == 1 {
                    let idx = self.submenu_states[self.selected_feature_index]
                        .selected()
                        .unwrap_or(0);
                    if let Some((_, screen)) = self.submenu().get(idx) {
                        return Ok(Some(Action::Open(*screen)));
                    }
                } else {
                    self.active_panel = 1;
                }
            }
            KeyCode::Esc => {
                if self.active_panel == 1 {
                    self.active_panel = 0;
                } else {
                    self.open_exit_dialog();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    /// Refreshes the bed summary shown under the welcome banner.
    fn on_open(&mut self, registry: &Registry) -> Result<()> {
        let rooms = registry.room_categories()?;
        let free: u32 = rooms.iter().map(|r| r.available_beds).sum();
        let total: u32 = rooms.iter().map(|r| r.total_beds).sum();
        self.bed_summary = Some(format!(
            "{free} of {total} beds free across {} room categories",
            rooms.len()
        ));
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 16, 28))),
            frame.area(),
        );

        let area = frame.area();

        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let welcome_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(75, 75, 120)))
            .style(Style::default().bg(Color::Rgb(24, 24, 40)));
        let welcome_inner = welcome_block.inner(main_layout[0]);
        frame.render_widget(welcome_block, main_layout[0]);

        let welcome = Text::from(vec![
            Line::from(vec![
                Span::styled(
                    "Wardbook ",
                    Style::default()
                        .fg(Color::Rgb(129, 199, 245))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    "front desk",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                self.bed_summary.clone().unwrap_or_default(),
                Style::default().fg(Color::Rgb(140, 219, 140)),
            )),
        ]);
        frame.render_widget(
            Paragraph::new(welcome).alignment(Alignment::Center),
            welcome_inner,
        );

        frame.render_widget(
            Paragraph::new("Please select a task:")
                .style(Style::default().fg(Color::Rgb(180, 190, 254)))
                .alignment(Alignment::Center),
            main_layout[1],
        );

        let content_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .spacing(2)
            .margin(1)
            .split(main_layout[2]);

        let menu_focus = self.selection_mode == 0;

        let feature_items: Vec<ListItem> = MENU
            .iter()
            .enumerate()
            .map(|(idx, (icon, feature, _))| {
                let selected = idx == self.selected_feature_index;
                let style = match (selected, menu_focus && self.active_panel == 0) {
                    (true, true) => highlight(Color::Rgb(250, 250, 110)),
                    (true, false) => highlight(Color::Rgb(140, 219, 140)),
                    _ => Style::default().fg(Color::Rgb(200, 200, 220)),
                };
                let prefix = if selected { " ► " } else { "   " };
                ListItem::new(format!("{prefix}{icon} {feature}")).style(style)
            })
            .collect();

        let left_block = panel(
            " 🏥 Hospital Management ",
            menu_focus && self.active_panel == 0,
        );
        let left_inner = left_block.inner(content_layout[0]);
        frame.render_widget(left_block, content_layout[0]);
        frame.render_widget(
            List::new(feature_items).block(Block::default().padding(Padding::new(0, 0, 1, 0))),
            left_inner,
        );

        let state = &self.submenu_states[self.selected_feature_index];
        let submenu_items: Vec<ListItem> = self
            .submenu()
            .iter()
            .enumerate()
            .map(|(idx, (label, _))| {
                let selected = state.selected() == Some(idx);
                let style = match (selected, menu_focus && self.active_panel == 1) {
                    (true, true) => highlight(Color::Rgb(250, 250, 110)),
                    (true, false) => highlight(Color::Rgb(129, 199, 245)),
                    _ => Style::default().fg(Color::Rgb(200, 200, 220)),
                };
                let prefix = if selected { " ► " } else { "   " };
                ListItem::new(format!("{prefix}{label}")).style(style)
            })
            .collect();

        let right_block = panel(" Sub menu ", menu_focus && self.active_panel == 1);
        let right_inner = right_block.inner(content_layout[1]);
        frame.render_widget(right_block, content_layout[1]);
        frame.render_widget(
            List::new(submenu_items).block(Block::default().padding(Padding::new(2, 0, 1, 0))),
            right_inner,
        );

        frame.render_widget(
            Paragraph::new(
                "←→: Switch panels | ↑↓: Navigate | Enter: Select | Tab: Exit button | Ctrl+Q: Quit",
            )
            .style(Style::default().fg(Color::Rgb(140, 140, 170)))
            .alignment(Alignment::Center),
            main_layout[3],
        );

        let exit_focused = self.selection_mode == 1;
        let exit_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if exit_focused {
                Color::Rgb(255, 100, 100)
            } else {
                Color::Rgb(100, 100, 140)
            }))
            .style(Style::default().bg(Color::Rgb(26, 26, 36)));
        let exit_inner = exit_block.inner(main_layout[4]);
        frame.render_widget(exit_block, main_layout[4]);
        frame.render_widget(
            Paragraph::new(if exit_focused { "[ Exit ]" } else { "  Exit  " })
                .style(if exit_focused {
                    highlight(Color::Rgb(255, 100, 100))
                } else {
                    Style::default().fg(Color::Rgb(180, 180, 200))
                })
                .alignment(Alignment::Center),
            exit_inner,
        );

        if self.show_exit_dialog {
            self.render_exit_dialog(frame, area);
        }
    }
}

impl Home {
    fn render_exit_dialog(&self, frame: &mut Frame, area: Rect) {
        let dialog_area = Rect::new(
            area.width.saturating_sub(44) / 2,
            area.height.saturating_sub(8) / 2,
            44.min(area.width),
            8.min(area.height),
        );
        frame.render_widget(Clear, dialog_area);

        let dialog_block = Block::default()
            .title(" Confirm Exit ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(230, 230, 250))
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(140, 140, 200)))
            .style(Style::default().bg(Color::Rgb(30, 30, 46)));
        let inner = dialog_block.inner(dialog_area);
        frame.render_widget(dialog_block, dialog_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(inner);

        frame.render_widget(
            Paragraph::new("Records are kept in memory only. Exit?")
                .style(highlight(Color::Rgb(220, 220, 240)))
                .alignment(Alignment::Center),
            rows[0],
        );

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let choices = [
            ("Yes", Color::Rgb(140, 219, 140)),
            ("No", Color::Rgb(255, 100, 100)),
        ];
        for (idx, (label, accent)) in choices.into_iter().enumerate() {
            let selected = self.exit_dialog_selected == idx;
            let (text, style) = if selected {
                (format!("► {label} ◄"), highlight(accent))
            } else {
                (format!("  {label}  "), Style::default().fg(Color::Rgb(180, 180, 200)))
            };
            frame.render_widget(
                Paragraph::new(text).style(style).alignment(Alignment::Center),
                buttons[idx],
            );
        }
    }
}

fn highlight(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(highlight(Color::Rgb(230, 230, 250)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused {
            Color::Rgb(250, 250, 110)
        } else {
            Color::Rgb(140, 140, 200)
        }))
        .style(Style::default().bg(Color::Rgb(22, 22, 35)))
}
