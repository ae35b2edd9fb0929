//! The schedule generator
//!
//! Formats the task list and window into a prompt, makes a single call to
//! the external model, parses the response, and validates the result
//! locally before anyone sees it. Every failure mode is a distinct typed
//! outcome; none of them are fatal.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::parser::parse_schedule;
use super::prompt::build_prompt;
use super::validate::{ConstraintViolation, validate_schedule};
use crate::domain::{ScheduleEntry, Task, TimeWindow};
use crate::llm::{CompletionRequest, LlmClient, LlmError};

/// Ways a generation call can fail
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("No tasks to schedule. Add tasks first.")]
    NoTasks,

    #[error("Scheduling is not configured: {0}")]
    NotConfigured(String),

    #[error("External call failed: {0}")]
    Api(#[from] LlmError),

    #[error("Could not parse the model response: {0}")]
    Parse(String),

    #[error("The model returned an invalid schedule: {0}")]
    Constraint(#[from] ConstraintViolation),
}

/// Schedule generator bound to an optional LLM client
///
/// `llm` is `None` when the credential is absent; `generate` then reports
/// `NotConfigured` without attempting a call.
#[derive(Clone)]
pub struct ScheduleGenerator {
    llm: Option<Arc<dyn LlmClient>>,
    max_tokens: u32,
}

impl ScheduleGenerator {
    pub fn new(llm: Option<Arc<dyn LlmClient>>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    /// Whether a client is available
    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    /// Generate a validated schedule for the tasks within the window
    ///
    /// On success returns the entries sorted by start time plus a short
    /// status message naming unplaced tasks and remaining slack.
    /// Preconditions (non-empty tasks, configured client) are checked
    /// before any external call; an invalid window is unrepresentable
    /// (`TimeWindow` enforces `start < end` at construction).
    pub async fn generate(
        &self,
        tasks: &[Task],
        window: &TimeWindow,
    ) -> Result<(Vec<ScheduleEntry>, String), ScheduleError> {
        debug!(tasks = tasks.len(), %window, "generate: called");

        if tasks.is_empty() {
            return Err(ScheduleError::NoTasks);
        }

        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| ScheduleError::NotConfigured("API key environment variable is not set".to_string()))?;

        let request = CompletionRequest {
            system_prompt: String::new(),
            prompt: build_prompt(tasks, window),
            max_tokens: self.max_tokens,
        };

        info!(tasks = tasks.len(), %window, "generate: calling model");
        let response = llm.complete(request).await?;

        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ScheduleError::Parse("Model returned no content".to_string()))?;
        debug!(content_len = content.len(), "generate: got response");

        let mut entries = parse_schedule(&content).map_err(ScheduleError::Parse)?;

        validate_schedule(&entries, tasks, window)?;

        // Sort by parsed start time for a deterministic table and timeline
        // regardless of the order the model emitted.
        entries.sort_by_key(|e| e.start().ok());

        let message = status_message(tasks, &entries, window);
        info!(placed = entries.len(), %message, "generate: success");
        Ok((entries, message))
    }
}

/// Summarize a generation result: placed count, unplaced names, slack
fn status_message(tasks: &[Task], entries: &[ScheduleEntry], window: &TimeWindow) -> String {
    let mut message = format!("Scheduled {} of {} tasks.", entries.len(), tasks.len());

    let unplaced = unscheduled_names(tasks, entries);
    if !unplaced.is_empty() {
        message.push_str(&format!(" Unscheduled: {}.", unplaced.join(", ")));
    }

    let scheduled: i64 = entries.iter().filter_map(ScheduleEntry::duration_min).sum();
    let slack = window.minutes() - scheduled;
    if slack > 0 {
        message.push_str(&format!(" {} min of free time remain.", slack));
    }

    message
}

/// Input task names not covered by any entry, preserving input order
///
/// Duplicate input names are matched per occurrence.
fn unscheduled_names(tasks: &[Task], entries: &[ScheduleEntry]) -> Vec<String> {
    let mut placed: Vec<&str> = entries.iter().map(|e| e.task_name.as_str()).collect();
    let mut unplaced = Vec::new();

    for task in tasks {
        if let Some(pos) = placed.iter().position(|n| *n == task.name) {
            placed.swap_remove(pos);
        } else {
            unplaced.push(task.name.clone());
        }
    }

    if !placed.is_empty() {
        // Validation guarantees this cannot happen; log rather than panic.
        warn!(?placed, "unscheduled_names: entries without matching tasks");
    }

    unplaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("Write report", 120, Priority::High).unwrap(),
            Task::new("Email replies", 30, Priority::Low).unwrap(),
        ]
    }

    fn window() -> TimeWindow {
        TimeWindow::parse("09:00", "17:00").unwrap()
    }

    fn generator_with(responses: Vec<CompletionResponse>) -> (ScheduleGenerator, Arc<MockLlmClient>) {
        let mock = Arc::new(MockLlmClient::new(responses));
        let generator = ScheduleGenerator::new(Some(mock.clone() as Arc<dyn LlmClient>), 1024);
        (generator, mock)
    }

    const GOOD: &str = r#"[
        {"task_name": "Email replies", "start_time": "11:00", "end_time": "11:30", "priority": "low"},
        {"task_name": "Write report", "start_time": "09:00", "end_time": "11:00", "priority": "high"}
    ]"#;

    #[tokio::test]
    async fn test_generate_success_sorts_entries() {
        let (generator, mock) = generator_with(vec![CompletionResponse::text(GOOD)]);

        let (entries, message) = generator.generate(&tasks(), &window()).await.unwrap();

        assert_eq!(mock.call_count(), 1);
        assert_eq!(entries.len(), 2);
        // Sorted by start time even though the model emitted them reversed
        assert_eq!(entries[0].task_name, "Write report");
        assert_eq!(entries[1].task_name, "Email replies");
        assert!(message.contains("Scheduled 2 of 2 tasks"));
        // 480 window - 150 scheduled
        assert!(message.contains("330 min of free time remain"));
    }

    #[tokio::test]
    async fn test_generate_reports_unscheduled() {
        let partial = r#"[{"task_name": "Write report", "start_time": "09:00", "end_time": "11:00", "priority": "high"}]"#;
        let (generator, _) = generator_with(vec![CompletionResponse::text(partial)]);

        let (entries, message) = generator.generate(&tasks(), &window()).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert!(message.contains("Scheduled 1 of 2 tasks"));
        assert!(message.contains("Unscheduled: Email replies"));
    }

    #[tokio::test]
    async fn test_generate_empty_tasks_never_calls_model() {
        let (generator, mock) = generator_with(vec![CompletionResponse::text(GOOD)]);

        let err = generator.generate(&[], &window()).await.unwrap_err();

        assert!(matches!(err, ScheduleError::NoTasks));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_unconfigured_never_calls_model() {
        let generator = ScheduleGenerator::new(None, 1024);
        assert!(!generator.is_configured());

        let err = generator.generate(&tasks(), &window()).await.unwrap_err();
        assert!(matches!(err, ScheduleError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_generate_rejects_overlapping_schedule() {
        let overlapping = r#"[
            {"task_name": "Write report", "start_time": "09:00", "end_time": "11:00", "priority": "high"},
            {"task_name": "Email replies", "start_time": "10:30", "end_time": "11:00", "priority": "low"}
        ]"#;
        let (generator, _) = generator_with(vec![CompletionResponse::text(overlapping)]);

        let err = generator.generate(&tasks(), &window()).await.unwrap_err();
        assert!(matches!(err, ScheduleError::Constraint(ConstraintViolation::Overlap { .. })));
    }

    #[tokio::test]
    async fn test_generate_rejects_out_of_window_schedule() {
        let outside = r#"[{"task_name": "Write report", "start_time": "07:00", "end_time": "09:00", "priority": "high"}]"#;
        let (generator, _) = generator_with(vec![CompletionResponse::text(outside)]);

        let err = generator.generate(&tasks(), &window()).await.unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Constraint(ConstraintViolation::OutOfWindow { .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_parse_failure() {
        let (generator, _) = generator_with(vec![CompletionResponse::text("Sorry, I can't help with that.")]);

        let err = generator.generate(&tasks(), &window()).await.unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(_)));
    }

    #[tokio::test]
    async fn test_generate_empty_content() {
        let empty = CompletionResponse {
            content: None,
            usage: Default::default(),
        };
        let (generator, _) = generator_with(vec![empty]);

        let err = generator.generate(&tasks(), &window()).await.unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(_)));
    }

    #[tokio::test]
    async fn test_generate_api_error_propagates() {
        // Mock with no responses errors on the first call
        let (generator, mock) = generator_with(vec![]);

        let err = generator.generate(&tasks(), &window()).await.unwrap_err();
        assert!(matches!(err, ScheduleError::Api(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_status_message_full_window() {
        let tasks = vec![Task::new("All day", 480, Priority::Medium).unwrap()];
        let entries = vec![ScheduleEntry {
            task_name: "All day".to_string(),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            priority: Priority::Medium,
        }];

        let message = status_message(&tasks, &entries, &window());
        assert!(message.contains("Scheduled 1 of 1 tasks"));
        assert!(!message.contains("free time"));
        assert!(!message.contains("Unscheduled"));
    }
}
