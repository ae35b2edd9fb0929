//! Persistence: the task store and the planning log

mod log;
mod tasks;

pub use log::{PlanningLog, PlanningRequestRecord, REQUEST_FILE, SCHEDULE_FILE, ScheduleRecord};
pub use tasks::TaskStore;
