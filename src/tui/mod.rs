//! Terminal User Interface Module
//!
//! Interactive front-end for the ATR Analyzer, built with Ratatui.
//!
//! # Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │            ⚡ ATR Analyzer  http://localhost:8000                │
//! ├─ Document ──────────────────────────────────────────────────────┤
//! │ ~/docs/atr-2024.pdf                                             │
//! ├─ Analysis ──────────────────────────────────────────────────────┤
//! │ 📄 atr-2024.pdf  84.2 KiB · application/pdf                      │
//! │  Analyze ATR   Ctrl+R / F5                                      │
//! │ ✓ 12 parameters extracted at 14:02:11                           │
//! ├─ Extracted Technical Parameters ────────────────────────────────┤
//! │ installed_power: 150 kW                                         │
//! │ voltage:         20 kV                                          │
//! └─────────────────────────────────────────────────────────────────┘
//!  [Enter] Select [Ctrl+R] Analyze [Ctrl+L] Clear [Ctrl+Q] Quit [F1] Help
//! ```

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent, View};
pub use event::{AppAction, EventHandler};

use crate::client::ExtractionService;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run(
    config: crate::config::Config,
    service: Arc<dyn ExtractionService>,
    initial_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    info!("Starting TUI mode against {}", config.service.base_url);

    let mut app = App::new(config, service);
    if let Some(path) = initial_file {
        app.preselect(path).await;
    }

    let mut terminal = init_terminal()?;
    let mut events = EventHandler::new(std::time::Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            action = events.next() => match action {
                Some(AppAction::Quit) | Some(AppAction::ForceQuit) | None => break,
                Some(action) => app.handle_action(action).await,
            },
            Some(event) = app.next_event() => app.handle_event(event),
        }

        if app.should_quit {
            break;
        }
    }

    info!("TUI exited normally");
    Ok(())
}
