//! Dayplan - AI-assisted daily schedule planner
//!
//! The user enters tasks (name, duration, priority) and an available time
//! window; an external LLM proposes a non-overlapping, priority-aware
//! schedule, which is validated locally before display. Everything else is
//! deterministic: task CRUD, JSON persistence, prompt construction,
//! response parsing, and rendering.
//!
//! # Modules
//!
//! - [`domain`] - Tasks, priorities, time windows, schedule entries
//! - [`store`] - Task store and planning log (JSON files)
//! - [`llm`] - LLM client trait and Gemini implementation
//! - [`scheduler`] - Prompt, parse, and validate pipeline
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//! - [`tui`] - Terminal user interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod prompts;
pub mod scheduler;
pub mod store;
pub mod tui;

// Re-export commonly used types
pub use config::{Config, LlmConfig, StorageConfig, UiConfig};
pub use domain::{
    MAX_DURATION_MIN, Priority, ScheduleEntry, Task, TaskError, TimeWindow, WindowError, minutes_by_priority,
    total_scheduled_minutes, utilization_pct,
};
pub use llm::{CompletionRequest, CompletionResponse, GeminiClient, LlmClient, LlmError, create_client};
pub use scheduler::{ConstraintViolation, ScheduleError, ScheduleGenerator, build_prompt, parse_schedule,
    validate_schedule};
pub use store::{PlanningLog, PlanningRequestRecord, ScheduleRecord, TaskStore};
