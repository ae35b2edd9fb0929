//! Task record and input validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Priority;

/// Upper bound on a single task's duration (24 hours)
pub const MAX_DURATION_MIN: u32 = 1440;

/// Errors from task input and list operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task name must not be empty")]
    EmptyName,

    #[error("Duration must be between 1 and {MAX_DURATION_MIN} minutes, got {0}")]
    InvalidDuration(u32),

    #[error("Task index {index} out of range (list has {len} tasks)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A user-defined unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub duration_min: u32,
    pub priority: Priority,
}

impl Task {
    /// Create a validated task
    ///
    /// The name is trimmed; empty names and durations outside
    /// `[1, MAX_DURATION_MIN]` are rejected.
    pub fn new(name: &str, duration_min: u32, priority: Priority) -> Result<Self, TaskError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TaskError::EmptyName);
        }
        if duration_min == 0 || duration_min > MAX_DURATION_MIN {
            return Err(TaskError::InvalidDuration(duration_min));
        }

        Ok(Self {
            name: name.to_string(),
            duration_min,
            priority,
        })
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} min, {} priority)", self.name, self.duration_min, self.priority)
    }
}
