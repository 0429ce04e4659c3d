//! Application state and main loop.
//!
//! The app owns the [`Registry`] and hands it to whichever screen is active.
//! The home menu picks a [`Screen`]; the screen runs until it asks to go back.

use crate::components::{home::Home, hospital, Component};
use crate::db::Registry;
use crate::tui::{self, Tui};
use anyhow::Result;
use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

/// Every screen reachable from the home menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    PatientRegister,
    PatientList,
    StaffAdd,
    StaffList,
    DoctorList,
    AppointmentSchedule,
    DoctorSchedule,
    AppointmentList,
    RoomAssign,
    Discharge,
    EmergencyAdmission,
    RoomOccupancy,
    RecordCreate,
    PatientReport,
    BillingProcess,
    TreatmentCost,
    BillingHistory,
    Efficiency,
    MedicationStock,
    MedicationList,
}

/// What a component asks the app to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open(Screen),
    Back,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Home,
    Running(Screen),
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    registry: Registry,
    home: Home,
    /// The open screen; `None` while on the home menu.
    active: Option<Box<dyn Component>>,
}

impl App {
    pub fn new(registry: Registry) -> Self {
        Self {
            state: AppState::Home,
            should_quit: false,
            registry,
            home: Home::new(),
            active: None,
        }
    }

    /// Runs the draw/input loop until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing or reading terminal events fails.
    pub fn run(&mut self, tui: &mut Tui) -> Result<()> {
        self.home.on_open(&self.registry)?;

        while !self.should_quit {
            tui.draw(|frame| self.render_ui(frame))?;
            self.handle_event(tui.next_event()?)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: tui::Event) -> Result<()> {
        let key = match event {
            tui::Event::Tick => {
                if let Some(active) = &mut self.active {
                    active.on_tick();
                }
                return Ok(());
            }
            tui::Event::Input(TermEvent::Key(key)) if key.kind == KeyEventKind::Press => key,
            tui::Event::Input(_) => return Ok(()),
        };

        if is_quit(&key) {
            self.should_quit = true;
            return Ok(());
        }

        let action = match &mut self.active {
            Some(active) => active.handle_input(key, &mut self.registry)?,
            None => self.home.handle_input(key, &mut self.registry)?,
        };

        match action {
            Some(Action::Open(screen)) => self.open(screen)?,
            Some(Action::Back) => {
                debug!(state = ?self.state, "back to home");
                self.active = None;
                self.state = AppState::Home;
                self.home.on_open(&self.registry)?;
            }
            Some(Action::Quit) => self.should_quit = true,
            None => {}
        }
        Ok(())
    }

    fn open(&mut self, screen: Screen) -> Result<()> {
        debug!(?screen, "opening screen");
        let mut component = hospital::open(screen);
        component.on_open(&self.registry)?;
        self.active = Some(component);
        self.state = AppState::Running(screen);
        Ok(())
    }

    fn render_ui(&self, frame: &mut tui::Frame<'_>) {
        match (&self.state, &self.active) {
            (AppState::Running(_), Some(active)) => active.render(frame),
            _ => self.home.render(frame),
        }
    }
}

/// `Ctrl+Q` quits from any screen.
fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        let key = KeyEvent::new(code, modifiers);
        app.handle_event(tui::Event::Input(TermEvent::Key(key)))
            .unwrap();
    }

    #[test]
    fn screens_open_and_return_home() {
        let mut app = App::new(fixtures::registry());
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.state, AppState::Running(Screen::PatientRegister));
        assert!(app.active.is_some());

        app.handle_event(tui::Event::Tick).unwrap();
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.state, AppState::Home);
        assert!(app.active.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn ctrl_q_quits_from_any_screen() {
        let mut app = App::new(fixtures::registry());
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
