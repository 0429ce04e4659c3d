use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    terminal,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tracing::debug;

#[derive(Debug, Clone)]
pub enum Event {
    Input(event::Event),
    /// No input within one tick; used to expire form messages.
    Tick,
}

pub type Frame<'a> = ratatui::Frame<'a>;

/// Leaves raw mode and the alternate screen. Safe to call more than once.
pub fn restore() -> Result<()> {
    terminal::disable_raw_mode()?;
    crossterm::execute!(
        io::stdout(),
        terminal::LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    Ok(())
}

pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    tick_rate: Duration,
}

impl Tui {
    pub fn new(terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Self {
        Self {
            terminal,
            tick_rate: Duration::from_millis(250),
        }
    }

    pub fn init(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture
        )?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        debug!(tick_ms = self.tick_rate.as_millis() as u64, "terminal ready");
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.terminal.show_cursor()?;
        restore()?;
        debug!("terminal restored");
        Ok(())
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Waits up to one tick for input.
    pub fn next_event(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            return Ok(Event::Input(event::read()?));
        }
        Ok(Event::Tick)
    }
}
