//! Schedule entries produced by the generator

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::window::{WindowError, parse_time};
use super::{Priority, Task};

/// One placed task within the day's schedule
///
/// Times are kept as `HH:MM` strings — the wire and log format — and parsed
/// on demand for validation and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub task_name: String,
    pub start_time: String,
    pub end_time: String,
    pub priority: Priority,
}

impl ScheduleEntry {
    pub fn start(&self) -> Result<NaiveTime, WindowError> {
        parse_time(&self.start_time)
    }

    pub fn end(&self) -> Result<NaiveTime, WindowError> {
        parse_time(&self.end_time)
    }

    /// Entry duration in minutes; `None` when either time fails to parse
    /// or the interval is inverted
    pub fn duration_min(&self) -> Option<i64> {
        let start = self.start().ok()?;
        let end = self.end().ok()?;
        let minutes = (end - start).num_minutes();
        (minutes > 0).then_some(minutes)
    }
}

/// Sum of entry durations, skipping entries with unparseable times
pub fn total_scheduled_minutes(entries: &[ScheduleEntry]) -> i64 {
    entries.iter().filter_map(ScheduleEntry::duration_min).sum()
}

/// Scheduled minutes per priority tier, highest first
///
/// The input task's priority wins over whatever the model echoed back:
/// entry names are matched against the task list and bucketed by the
/// task's own priority. Entries naming no known task fall back to the
/// entry's priority field.
pub fn minutes_by_priority(entries: &[ScheduleEntry], tasks: &[Task]) -> Vec<(Priority, i64)> {
    let mut totals = [(Priority::High, 0i64), (Priority::Medium, 0), (Priority::Low, 0)];

    for entry in entries {
        let Some(minutes) = entry.duration_min() else {
            continue;
        };
        let priority = tasks
            .iter()
            .find(|t| t.name == entry.task_name)
            .map(|t| t.priority)
            .unwrap_or(entry.priority);

        if let Some(slot) = totals.iter_mut().find(|(p, _)| *p == priority) {
            slot.1 += minutes;
        }
    }

    totals.to_vec()
}

/// Utilization percentage, guarded against a zero-width window
pub fn utilization_pct(scheduled_min: i64, available_min: i64) -> f64 {
    if available_min <= 0 {
        return 0.0;
    }
    scheduled_min as f64 / available_min as f64 * 100.0
}
