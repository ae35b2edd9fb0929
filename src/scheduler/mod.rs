//! Schedule generation pipeline: prompt, call, parse, validate

mod generator;
mod parser;
mod prompt;
mod validate;

pub use generator::{ScheduleError, ScheduleGenerator};
pub use parser::parse_schedule;
pub use prompt::build_prompt;
pub use validate::{ConstraintViolation, validate_schedule};
