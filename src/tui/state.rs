//! TUI application state
//!
//! One `AppState` per session, created from persisted data on startup and
//! dropped on exit. Key handling mutates it; views read it; the runner
//! drains its pending-action queue. No process-wide state.

use std::time::Instant;

use crate::domain::{
    Priority, ScheduleEntry, Task, TimeWindow, WindowError, minutes_by_priority, total_scheduled_minutes,
    utilization_pct,
};

/// Top-level views, cycled with Tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Tasks,
    Schedule,
    Logs,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            Self::Tasks => Self::Schedule,
            Self::Schedule => Self::Logs,
            Self::Logs => Self::Tasks,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Tasks => Self::Logs,
            Self::Schedule => Self::Tasks,
            Self::Logs => Self::Schedule,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Tasks => "Tasks",
            Self::Schedule => "Schedule",
            Self::Logs => "Logs",
        }
    }
}

/// Which window field is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowField {
    Start,
    End,
}

/// Current interaction mode
///
/// The add-task form is a three-stage input: name, then duration, then
/// priority. Each stage carries the values collected so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionMode {
    Normal,
    TaskName(String),
    TaskDuration { name: String, buf: String },
    TaskPriority { name: String, duration_min: u32, selected: Priority },
    WindowInput { field: WindowField, buf: String },
    Confirm(ConfirmDialog),
    Help,
}

/// Action awaiting user confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask(usize),
}

/// Confirmation dialog state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub action: ConfirmAction,
    pub message: String,
    /// true = Yes selected
    pub selected_button: bool,
}

impl ConfirmDialog {
    pub fn delete_task(index: usize, task: &Task) -> Self {
        Self {
            action: ConfirmAction::DeleteTask(index),
            message: format!("Delete '{}'?", task.name),
            selected_button: false,
        }
    }
}

/// Actions queued by key handling for the runner to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    AddTask {
        name: String,
        duration_min: u32,
        priority: Priority,
    },
    DeleteTask(usize),
    Generate,
}

/// Session state for one TUI run
#[derive(Debug)]
pub struct AppState {
    pub current_view: View,
    pub interaction_mode: InteractionMode,

    /// Display copy of the task list, synced from the store by the runner
    pub tasks: Vec<Task>,
    /// The current schedule (empty after a failed generation)
    pub schedule: Vec<ScheduleEntry>,
    /// Status message from the last successful generation
    pub status_message: Option<String>,

    /// Window inputs as entered; parsed on use
    pub window_start: String,
    pub window_end: String,

    /// Selected row in the task table
    pub task_selection: usize,

    /// Transient error shown in the footer, cleared on next key press
    pub error_message: Option<String>,

    /// Action queue drained by the runner each tick
    pub pending_action: Option<PendingAction>,

    /// Generation in flight; inputs that would race it are locked
    pub generating: bool,
    pub generating_since: Option<Instant>,
    pub spinner_frame: usize,

    /// Credential present at startup; gates the generate action
    pub credential_available: bool,

    pub should_quit: bool,

    /// Raw planning-log file contents for the Logs view
    pub raw_request_log: Option<String>,
    pub raw_schedule_log: Option<String>,
}

impl AppState {
    pub fn new(window_start: String, window_end: String, credential_available: bool) -> Self {
        Self {
            current_view: View::Tasks,
            interaction_mode: InteractionMode::Normal,
            tasks: Vec::new(),
            schedule: Vec::new(),
            status_message: None,
            window_start,
            window_end,
            task_selection: 0,
            error_message: None,
            pending_action: None,
            generating: false,
            generating_since: None,
            spinner_frame: 0,
            credential_available,
            should_quit: false,
            raw_request_log: None,
            raw_schedule_log: None,
        }
    }

    /// Advance animation state; called on every tick
    pub fn tick(&mut self) {
        if self.generating {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Parse the current window inputs
    pub fn window(&self) -> Result<TimeWindow, WindowError> {
        TimeWindow::parse(&self.window_start, &self.window_end)
    }

    /// Whether the generate action is currently allowed
    ///
    /// Requires a credential, a non-empty task list, a valid window, and no
    /// generation already in flight. The runner re-checks this before
    /// spawning the call, so a programmatic trigger cannot bypass it.
    pub fn can_generate(&self) -> bool {
        self.credential_available && !self.tasks.is_empty() && self.window().is_ok() && !self.generating
    }

    /// Why generation is unavailable, for the error message
    pub fn generate_blocker(&self) -> Option<&'static str> {
        if self.generating {
            Some("Generation already in progress")
        } else if !self.credential_available {
            Some("GEMINI_API_KEY is not set; scheduling is disabled")
        } else if self.tasks.is_empty() {
            Some("Add tasks before generating a schedule")
        } else if self.window().is_err() {
            Some("Fix the time window first (press w)")
        } else {
            None
        }
    }

    pub fn select_next_task(&mut self) {
        if !self.tasks.is_empty() {
            self.task_selection = (self.task_selection + 1).min(self.tasks.len() - 1);
        }
    }

    pub fn select_prev_task(&mut self) {
        self.task_selection = self.task_selection.saturating_sub(1);
    }

    /// Keep the selection valid after the task list changed
    pub fn clamp_selection(&mut self) {
        if self.tasks.is_empty() {
            self.task_selection = 0;
        } else {
            self.task_selection = self.task_selection.min(self.tasks.len() - 1);
        }
    }

    /// Total minutes the window offers; 0 when the inputs do not parse
    pub fn available_minutes(&self) -> i64 {
        self.window().map(|w| w.minutes()).unwrap_or(0)
    }

    pub fn scheduled_minutes(&self) -> i64 {
        total_scheduled_minutes(&self.schedule)
    }

    pub fn utilization(&self) -> f64 {
        utilization_pct(self.scheduled_minutes(), self.available_minutes())
    }

    /// Scheduled minutes per priority, highest first
    pub fn distribution(&self) -> Vec<(Priority, i64)> {
        minutes_by_priority(&self.schedule, &self.tasks)
    }
}
