//! Terminal User Interface
//!
//! A single-session dashboard:
//! - Tasks view with an add/delete form
//! - Schedule view with table, timeline, distribution, and metrics
//! - Logs view showing the raw planning-log files

mod app;
mod events;
mod runner;
pub mod state;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use runner::TuiRunner;
pub use state::{AppState, InteractionMode, View};

use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::store::{PlanningLog, TaskStore};

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI with the given stores and optional LLM client
pub async fn run(
    store: TaskStore,
    log: PlanningLog,
    llm: Option<Arc<dyn LlmClient>>,
    config: &Config,
) -> Result<()> {
    let terminal = init()?;

    // Guard ensures the terminal is restored even on early return/error
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(
        terminal,
        store,
        log,
        llm,
        config.llm.max_tokens,
        config.ui.window_start.clone(),
        config.ui.window_end.clone(),
    );
    runner.run().await
}
