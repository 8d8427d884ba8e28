//! dishdesk-tui - Terminal dashboard for a food-ordering backend
//!
//! Browse orders, foods, categories and customers in paged, searchable
//! tables, with a toast and a bell whenever a new order arrives.

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dishdesk_core::storage::config::Config;
use log::LevelFilter;
use ratatui::backend::CrosstermBackend;
use simplelog::{Config as LogConfig, WriteLogger};
use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::Path;

mod action;
mod app;
mod components;
mod error;
mod event;
mod layout;
mod service;

use app::App;
use error::TuiResult;

#[tokio::main]
async fn main() -> TuiResult<()> {
    let config_dir = Config::config_dir().ok();
    if let Some(dir) = &config_dir {
        init_logging(dir);
    }

    let config = match Config::load(None) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    };
    let mut app = App::new(config, config_dir)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    // Set panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = app.run_async(&mut terminal).await;

    // Cleanup terminal
    restore_terminal()?;

    // Report errors
    if let Err(ref err) = result {
        log::error!("Application error: {}", err);
        eprintln!("Application error: {}", err);
    }

    result
}

/// Log to a file in the config directory; the terminal belongs to the UI.
fn init_logging(dir: &Path) {
    if fs::create_dir_all(dir).is_err() {
        return;
    }
    if let Ok(log_file) = File::create(Config::log_file_in(dir)) {
        let _ = WriteLogger::init(LevelFilter::Debug, LogConfig::default(), log_file);
    }
}

/// Restore terminal to normal state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
