//! Local validation of model-produced schedules
//!
//! The external model is asked for a non-overlapping, within-window
//! schedule but nothing guarantees it complied. Every generated schedule
//! passes through here before it is shown or persisted; a violation fails
//! the whole generation.

use std::collections::HashMap;

use chrono::NaiveTime;
use thiserror::Error;
use tracing::debug;

use crate::domain::{ScheduleEntry, Task, TimeWindow};

/// A deterministically checkable constraint the schedule failed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstraintViolation {
    #[error("Entry '{task}' has unparseable time '{value}'")]
    UnparseableTime { task: String, value: String },

    #[error("Entry '{task}' ends at or before it starts ({start}-{end})")]
    InvertedEntry { task: String, start: String, end: String },

    #[error("Entry '{task}' ({start}-{end}) falls outside the window {window}")]
    OutOfWindow {
        task: String,
        start: String,
        end: String,
        window: String,
    },

    #[error("Entries '{first}' and '{second}' overlap")]
    Overlap { first: String, second: String },

    #[error("Task '{task}' is scheduled more often than it appears in the task list")]
    DuplicateTask { task: String },

    #[error("Entry '{task}' does not match any task in the list")]
    UnknownTask { task: String },
}

/// Check a schedule against the task list and window
///
/// Verifies, in order: every entry names a known task no more often than it
/// appears in the input; times parse and every entry has `start < end`;
/// every entry lies within the window; and, after a sort by start time, no
/// adjacent pair overlaps (O(n log n) total).
pub fn validate_schedule(
    entries: &[ScheduleEntry],
    tasks: &[Task],
    window: &TimeWindow,
) -> Result<(), ConstraintViolation> {
    debug!(
        entries = entries.len(),
        tasks = tasks.len(),
        %window,
        "validate_schedule: called"
    );

    // Duplicate names in the input are allowed, so track remaining
    // occurrences per name rather than a seen-set.
    let mut remaining: HashMap<&str, usize> = HashMap::new();
    for task in tasks {
        *remaining.entry(task.name.as_str()).or_insert(0) += 1;
    }

    let mut intervals: Vec<(NaiveTime, NaiveTime, &str)> = Vec::with_capacity(entries.len());

    for entry in entries {
        let count = remaining
            .get_mut(entry.task_name.as_str())
            .ok_or_else(|| ConstraintViolation::UnknownTask {
                task: entry.task_name.clone(),
            })?;
        if *count == 0 {
            return Err(ConstraintViolation::DuplicateTask {
                task: entry.task_name.clone(),
            });
        }
        *count -= 1;

        let start = entry.start().map_err(|_| ConstraintViolation::UnparseableTime {
            task: entry.task_name.clone(),
            value: entry.start_time.clone(),
        })?;
        let end = entry.end().map_err(|_| ConstraintViolation::UnparseableTime {
            task: entry.task_name.clone(),
            value: entry.end_time.clone(),
        })?;

        if start >= end {
            return Err(ConstraintViolation::InvertedEntry {
                task: entry.task_name.clone(),
                start: entry.start_time.clone(),
                end: entry.end_time.clone(),
            });
        }

        if !window.contains(start, end) {
            return Err(ConstraintViolation::OutOfWindow {
                task: entry.task_name.clone(),
                start: entry.start_time.clone(),
                end: entry.end_time.clone(),
                window: window.to_string(),
            });
        }

        intervals.push((start, end, &entry.task_name));
    }

    intervals.sort_by_key(|(start, _, _)| *start);
    for pair in intervals.windows(2) {
        let (_, prev_end, prev_name) = pair[0];
        let (next_start, _, next_name) = pair[1];
        if next_start < prev_end {
            return Err(ConstraintViolation::Overlap {
                first: prev_name.to_string(),
                second: next_name.to_string(),
            });
        }
    }

    debug!("validate_schedule: passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("Write report", 120, Priority::High).unwrap(),
            Task::new("Email replies", 30, Priority::Low).unwrap(),
            Task::new("Standup", 15, Priority::Medium).unwrap(),
        ]
    }

    fn window() -> TimeWindow {
        TimeWindow::parse("09:00", "17:00").unwrap()
    }

    fn entry(name: &str, start: &str, end: &str) -> ScheduleEntry {
        ScheduleEntry {
            task_name: name.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            priority: Priority::Medium,
        }
    }

    #[test]
    fn test_valid_schedule_passes() {
        let entries = vec![
            entry("Write report", "09:00", "11:00"),
            entry("Standup", "11:00", "11:15"),
            entry("Email replies", "11:15", "11:45"),
        ];
        assert_eq!(validate_schedule(&entries, &tasks(), &window()), Ok(()));
    }

    #[test]
    fn test_empty_schedule_passes() {
        assert_eq!(validate_schedule(&[], &tasks(), &window()), Ok(()));
    }

    #[test]
    fn test_back_to_back_entries_are_not_overlap() {
        let entries = vec![
            entry("Write report", "09:00", "11:00"),
            entry("Email replies", "11:00", "11:30"),
        ];
        assert_eq!(validate_schedule(&entries, &tasks(), &window()), Ok(()));
    }

    #[test]
    fn test_overlap_rejected() {
        let entries = vec![
            entry("Write report", "09:00", "11:00"),
            entry("Email replies", "10:30", "11:00"),
        ];
        let err = validate_schedule(&entries, &tasks(), &window()).unwrap_err();
        assert_eq!(
            err,
            ConstraintViolation::Overlap {
                first: "Write report".to_string(),
                second: "Email replies".to_string(),
            }
        );
    }

    #[test]
    fn test_overlap_detected_regardless_of_order() {
        // Entries arrive unsorted; validation must still find the clash.
        let entries = vec![
            entry("Email replies", "10:30", "11:00"),
            entry("Write report", "09:00", "11:00"),
        ];
        assert!(matches!(
            validate_schedule(&entries, &tasks(), &window()),
            Err(ConstraintViolation::Overlap { .. })
        ));
    }

    #[test]
    fn test_out_of_window_rejected() {
        let entries = vec![entry("Write report", "08:00", "10:00")];
        assert!(matches!(
            validate_schedule(&entries, &tasks(), &window()),
            Err(ConstraintViolation::OutOfWindow { .. })
        ));

        let entries = vec![entry("Write report", "16:00", "18:00")];
        assert!(matches!(
            validate_schedule(&entries, &tasks(), &window()),
            Err(ConstraintViolation::OutOfWindow { .. })
        ));
    }

    #[test]
    fn test_entry_touching_window_edges_passes() {
        let entries = vec![entry("Write report", "09:00", "17:00")];
        // 480 min entry for a 120 min task: duration mismatch is the
        // model's concern, not a hard constraint; bounds are satisfied.
        assert_eq!(validate_schedule(&entries, &tasks(), &window()), Ok(()));
    }

    #[test]
    fn test_inverted_entry_rejected() {
        let entries = vec![entry("Write report", "11:00", "09:00")];
        assert!(matches!(
            validate_schedule(&entries, &tasks(), &window()),
            Err(ConstraintViolation::InvertedEntry { .. })
        ));
    }

    #[test]
    fn test_zero_length_entry_rejected() {
        let entries = vec![entry("Standup", "10:00", "10:00")];
        assert!(matches!(
            validate_schedule(&entries, &tasks(), &window()),
            Err(ConstraintViolation::InvertedEntry { .. })
        ));
    }

    #[test]
    fn test_unknown_task_rejected() {
        let entries = vec![entry("Invented task", "09:00", "10:00")];
        assert_eq!(
            validate_schedule(&entries, &tasks(), &window()),
            Err(ConstraintViolation::UnknownTask {
                task: "Invented task".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_scheduling_rejected() {
        let entries = vec![
            entry("Standup", "09:00", "09:15"),
            entry("Standup", "10:00", "10:15"),
        ];
        assert_eq!(
            validate_schedule(&entries, &tasks(), &window()),
            Err(ConstraintViolation::DuplicateTask {
                task: "Standup".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_input_names_allow_matching_entry_count() {
        // Two tasks with the same name may legitimately both be placed.
        let tasks = vec![
            Task::new("Break", 15, Priority::Low).unwrap(),
            Task::new("Break", 15, Priority::Low).unwrap(),
        ];
        let entries = vec![entry("Break", "10:00", "10:15"), entry("Break", "15:00", "15:15")];
        assert_eq!(validate_schedule(&entries, &tasks, &window()), Ok(()));

        let three = vec![
            entry("Break", "10:00", "10:15"),
            entry("Break", "12:00", "12:15"),
            entry("Break", "15:00", "15:15"),
        ];
        assert!(matches!(
            validate_schedule(&three, &tasks, &window()),
            Err(ConstraintViolation::DuplicateTask { .. })
        ));
    }

    #[test]
    fn test_unparseable_time_rejected() {
        let entries = vec![entry("Standup", "nine o'clock", "10:00")];
        assert!(matches!(
            validate_schedule(&entries, &tasks(), &window()),
            Err(ConstraintViolation::UnparseableTime { .. })
        ));
    }
}
