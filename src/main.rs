use chrono::Utc;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{error::Error, fs::File, io, path::Path, sync::Mutex};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_manager::{app, config::Config, Task, TodoStore};

// Start the app.
pub fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    if let Some(path) = &config.log_file {
        init_logging(path)?;
    }
    info!(tick_rate_ms = config.tick_rate_ms, demo_seed = config.demo_seed, "starting");

    let seed = if config.demo_seed {
        vec![Task::new(1, "Finish project", Utc::now())]
    } else {
        Vec::new()
    };
    let app = app::ui::App::new(TodoStore::new(seed));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app::ui::run_app(&mut terminal, app, config.tick_rate());

    // Restore previous terminal state after exit
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    info!("stopped");
    Ok(())
}

// The terminal owns stdout, so log lines go to a file
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::options().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_manager=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
