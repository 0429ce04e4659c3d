mod app;
mod components;
mod config;
mod dates;
mod db;
mod demo;
mod error;
mod input;
mod models;
mod report;
mod tui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use config::Config;
use db::Registry;
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tui::Tui;

/// Hospital front-desk registry
#[derive(Parser, Debug)]
#[command(name = "wardbook", version)]
#[command(about = "Hospital front-desk registry: patients, staff, rooms, records and billing")]
struct Args {
    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run the scripted front-desk scenario and print its reports
    #[arg(long)]
    demo: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    init_tracing(&config, args.verbose)?;

    let mut registry = Registry::new(&config.rooms).context("Failed to set up the registry")?;
    info!(demo = args.demo, "wardbook started");

    if args.demo {
        return demo::run(&mut registry, &mut io::stdout().lock());
    }

    let _guard = CleanupGuard;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let mut tui = Tui::new(terminal);
    tui.init()?;

    let mut app = App::new(registry);
    let res = app.run(&mut tui);

    tui.exit()?;

    if let Err(e) = res {
        tracing::error!(error = %e, "application error");
        eprintln!("Application Error: {e:#}");
    }
    Ok(())
}

/// Sends log events to the configured file; the terminal belongs to the UI.
fn init_tracing(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wardbook={level}")));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install the log subscriber")?;
    Ok(())
}

struct CleanupGuard;

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = tui::restore();
    }
}
