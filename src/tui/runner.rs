//! TUI Runner - main loop that owns the terminal, stores, and generator
//!
//! The TuiRunner is responsible for:
//! - Draining pending actions queued by key handling (add/delete/generate)
//! - Persisting the task store after every mutation
//! - Spawning the generation call on a background task while the UI shows
//!   a spinner (the interaction is blocked; there is no cancellation)
//! - Rendering at ~30 FPS

use std::sync::Arc;
use std::time::Instant;

use eyre::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{AppState, PendingAction};
use super::views;
use crate::domain::ScheduleEntry;
use crate::llm::LlmClient;
use crate::scheduler::ScheduleGenerator;
use crate::store::{PlanningLog, TaskStore};

/// Result from the background generation task
#[derive(Debug)]
enum GenResult {
    Success { entries: Vec<ScheduleEntry>, message: String },
    Failure(String),
}

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,

    store: TaskStore,
    log: PlanningLog,
    generator: ScheduleGenerator,

    /// Receiver for the in-flight generation result
    gen_rx: Option<mpsc::Receiver<GenResult>>,
    /// Handle to the background generation task
    gen_task: Option<JoinHandle<()>>,
}

impl TuiRunner {
    /// Create a runner, restoring session display state from disk
    pub fn new(
        terminal: Tui,
        store: TaskStore,
        log: PlanningLog,
        llm: Option<Arc<dyn LlmClient>>,
        max_tokens: u32,
        window_start: String,
        window_end: String,
    ) -> Self {
        let generator = ScheduleGenerator::new(llm, max_tokens);

        let mut state = AppState::new(window_start, window_end, generator.is_configured());
        state.tasks = store.tasks().to_vec();
        if let Some(record) = log.load_last_schedule() {
            debug!(entries = record.entries.len(), "TuiRunner::new: restored last schedule");
            state.schedule = record.entries;
            state.status_message = Some(record.message);
        }
        state.raw_request_log = log.raw_request();
        state.raw_schedule_log = log.raw_schedule();

        Self {
            app: App::new(state),
            terminal,
            event_handler: EventHandler::new(std::time::Duration::from_millis(33)), // ~30 FPS
            store,
            log,
            generator,
            gen_rx: None,
            gen_task: None,
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        loop {
            self.terminal.draw(|frame| views::render(self.app.state(), frame))?;

            match self.event_handler.next().await? {
                Event::Tick => self.handle_tick(),
                Event::Key(key_event) => {
                    if self.app.handle_key(key_event) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        debug!("TuiRunner::run: exiting");
        Ok(())
    }

    /// Handle tick event - drain pending actions and generation results
    fn handle_tick(&mut self) {
        self.app.state_mut().tick();

        if let Some(action) = self.app.state_mut().pending_action.take() {
            debug!(?action, "TuiRunner::handle_tick: pending action");
            self.execute_action(action);
        }

        self.process_gen_result();
    }

    /// Execute a queued action
    fn execute_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::AddTask {
                name,
                duration_min,
                priority,
            } => match self.store.add(&name, duration_min, priority) {
                Ok(task) => {
                    info!(%task, "TuiRunner: task added");
                    self.persist_and_sync();
                }
                Err(e) => {
                    self.app.state_mut().set_error(e.to_string());
                }
            },
            PendingAction::DeleteTask(index) => match self.store.delete(index) {
                Ok(task) => {
                    info!(%task, index, "TuiRunner: task deleted");
                    self.persist_and_sync();
                }
                Err(e) => {
                    self.app.state_mut().set_error(e.to_string());
                }
            },
            PendingAction::Generate => self.start_generation(),
        }
    }

    /// Write the store and refresh the display copy of the task list
    fn persist_and_sync(&mut self) {
        if let Err(e) = self.store.persist() {
            warn!(error = %e, "TuiRunner: failed to persist tasks");
            self.app.state_mut().set_error(format!("Failed to save tasks: {}", e));
        }
        let state = self.app.state_mut();
        state.tasks = self.store.tasks().to_vec();
        state.clamp_selection();
    }

    /// Start the generation call on a background task
    ///
    /// Re-checks eligibility so a queued action cannot bypass the guards:
    /// with the credential unset, no external request is ever attempted.
    fn start_generation(&mut self) {
        let state = self.app.state();
        if !state.can_generate() {
            let reason = state.generate_blocker().unwrap_or("Cannot generate right now");
            debug!(%reason, "TuiRunner::start_generation: refused");
            self.app.state_mut().set_error(reason);
            return;
        }

        let window = match state.window() {
            Ok(w) => w,
            Err(e) => {
                self.app.state_mut().set_error(e.to_string());
                return;
            }
        };
        let tasks = state.tasks.clone();

        // Record the request before calling out
        if let Err(e) = self.log.record_request(&tasks, &window) {
            warn!(error = %e, "TuiRunner: failed to record planning request");
        }
        self.app.state_mut().raw_request_log = self.log.raw_request();

        info!(tasks = tasks.len(), %window, "TuiRunner: starting generation");
        let state = self.app.state_mut();
        state.generating = true;
        state.generating_since = Some(Instant::now());
        state.spinner_frame = 0;

        let (tx, rx) = mpsc::channel::<GenResult>(1);
        self.gen_rx = Some(rx);

        let generator = self.generator.clone();
        self.gen_task = Some(tokio::spawn(async move {
            let result = match generator.generate(&tasks, &window).await {
                Ok((entries, message)) => GenResult::Success { entries, message },
                Err(e) => GenResult::Failure(e.to_string()),
            };
            let _ = tx.send(result).await;
        }));
    }

    /// Apply a finished generation result, if one arrived
    fn process_gen_result(&mut self) {
        let Some(rx) = &mut self.gen_rx else {
            return;
        };
        let Ok(result) = rx.try_recv() else {
            return;
        };

        self.gen_rx = None;
        self.gen_task = None;

        match result {
            GenResult::Success { entries, message } => {
                info!(entries = entries.len(), "TuiRunner: generation succeeded");
                if let Err(e) = self.log.record_schedule(&entries, &message) {
                    warn!(error = %e, "TuiRunner: failed to record schedule");
                }
                let state = self.app.state_mut();
                state.schedule = entries;
                state.status_message = Some(message);
                state.current_view = super::state::View::Schedule;
            }
            GenResult::Failure(message) => {
                warn!(%message, "TuiRunner: generation failed");
                // A failed run clears the previous schedule; tasks and
                // window stay put for retry.
                if let Err(e) = self.log.record_schedule(&[], &message) {
                    warn!(error = %e, "TuiRunner: failed to record schedule");
                }
                let state = self.app.state_mut();
                state.schedule.clear();
                state.status_message = None;
                state.set_error(format!("Scheduling failed: {}", message));
            }
        }

        let state = self.app.state_mut();
        state.generating = false;
        state.generating_since = None;
        state.raw_schedule_log = self.log.raw_schedule();
    }
}
