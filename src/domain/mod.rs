//! Domain types: tasks, priorities, time windows, schedule entries

mod priority;
mod schedule;
mod task;
mod window;

pub use priority::Priority;
pub use schedule::{ScheduleEntry, minutes_by_priority, total_scheduled_minutes, utilization_pct};
pub use task::{MAX_DURATION_MIN, Task, TaskError};
pub use window::{TIME_FMT, TimeWindow, WindowError, parse_time};
