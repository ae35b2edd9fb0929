//! Planning log
//!
//! Records the most recent planning request and generated schedule as two
//! fixed-path JSON files. Each write overwrites the previous record —
//! single most-recent-run retention, not an append-only history. These
//! files are the only durable artifact that survives process restarts.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{ScheduleEntry, Task, TimeWindow};

/// File name for the planning request record
pub const REQUEST_FILE: &str = "planning_request.json";

/// File name for the schedule record
pub const SCHEDULE_FILE: &str = "schedule.json";

/// The task list and window submitted for one generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRequestRecord {
    pub tasks: Vec<Task>,
    pub window_start: String,
    pub window_end: String,
    pub saved_at: String,
}

/// The schedule and status message returned by one generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub entries: Vec<ScheduleEntry>,
    pub message: String,
    pub saved_at: String,
}

/// Writer/reader for the two planning-log files
#[derive(Debug, Clone)]
pub struct PlanningLog {
    dir: PathBuf,
}

impl PlanningLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn request_path(&self) -> PathBuf {
        self.dir.join(REQUEST_FILE)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.dir.join(SCHEDULE_FILE)
    }

    /// Record the inputs of a generation call, overwriting the previous record
    pub fn record_request(&self, tasks: &[Task], window: &TimeWindow) -> Result<()> {
        let record = PlanningRequestRecord {
            tasks: tasks.to_vec(),
            window_start: window.start_str(),
            window_end: window.end_str(),
            saved_at: now_stamp(),
        };
        self.write_json(&self.request_path(), &record)
    }

    /// Record the outcome of a generation call, overwriting the previous record
    ///
    /// Called with an empty entry list on failure, which also clears any
    /// previously persisted schedule.
    pub fn record_schedule(&self, entries: &[ScheduleEntry], message: &str) -> Result<()> {
        let record = ScheduleRecord {
            entries: entries.to_vec(),
            message: message.to_string(),
            saved_at: now_stamp(),
        };
        self.write_json(&self.schedule_path(), &record)
    }

    /// Tasks from the last recorded request; empty when absent or corrupt
    pub fn load_last_tasks(&self) -> Vec<Task> {
        read_json::<PlanningRequestRecord>(&self.request_path())
            .map(|r| r.tasks)
            .unwrap_or_default()
    }

    /// The last recorded schedule; `None` when absent or corrupt
    pub fn load_last_schedule(&self) -> Option<ScheduleRecord> {
        read_json(&self.schedule_path())
    }

    /// Raw request file contents, for the log inspection view
    pub fn raw_request(&self) -> Option<String> {
        fs::read_to_string(self.request_path()).ok()
    }

    /// Raw schedule file contents, for the log inspection view
    pub fn raw_schedule(&self) -> Option<String> {
        fs::read_to_string(self.schedule_path()).ok()
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create planning log directory")?;
        let json = serde_json::to_string_pretty(value).context("Failed to serialize log record")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(?path, "PlanningLog: wrote record");
        Ok(())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<T> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(?path, error = %e, "PlanningLog: corrupt record, ignoring");
            None
        }
    }
}

fn now_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
