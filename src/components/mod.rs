use crate::app::Action;
use crate::db::Registry;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::KeyEvent;

pub mod form;
pub mod home;
pub mod hospital;
pub mod table;

pub trait Component {
    fn handle_input(&mut self, event: KeyEvent, registry: &mut Registry)
        -> Result<Option<Action>>;
    fn render(&self, frame: &mut Frame);

    /// Called when the screen becomes visible.
    fn on_open(&mut self, _registry: &Registry) -> Result<()> {
        Ok(())
    }

    fn on_tick(&mut self) {}
}
