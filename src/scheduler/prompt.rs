//! Deterministic prompt construction for the scheduling call

use crate::domain::{Task, TimeWindow};
use crate::prompts::embedded;

/// Render the scheduling prompt for the given tasks and window
///
/// The output is a pure function of its inputs: same tasks and window,
/// same prompt text.
pub fn build_prompt(tasks: &[Task], window: &TimeWindow) -> String {
    let task_lines = tasks
        .iter()
        .map(|t| format!("- {} ({} min, {} priority)", t.name, t.duration_min, t.priority))
        .collect::<Vec<_>>()
        .join("\n");

    embedded::SCHEDULE
        .replace("{{tasks}}", &task_lines)
        .replace("{{start}}", &window.start_str())
        .replace("{{end}}", &window.end_str())
}
