//! TUI module
//!
//! Terminal user interface built with ratatui. The render loop runs on the
//! interactive thread: it draws, polls the controller for finished fetches
//! and pending log lines, and dispatches key events. It never performs
//! cluster I/O itself.

mod app;
mod theme;
pub mod views;

pub use app::{App, Focus, LogStatus};
pub use theme::Theme;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::controller::ScopeManager;
use crate::kube::ResourceClient;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Run the TUI until the operator quits
pub async fn run_tui<C: ResourceClient>(client: Arc<C>, context: String) -> Result<()> {
    tracing::debug!("Initializing TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let controller = ScopeManager::new(client);
    let mut app = App::new(controller, context, Theme::default());

    tracing::debug!("TUI initialized, entering main loop");

    loop {
        app.poll_controller();
        terminal.draw(|f| views::render(f, &app))?;

        // Handle input events (non-blocking); polling doubles as the tick
        // that drains controller results between keypresses
        if event::poll(TICK_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    break;
                }
            }
        }
    }

    tracing::debug!("TUI shutting down");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
