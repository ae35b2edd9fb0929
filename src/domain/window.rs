//! The time-of-day window available for scheduling

use chrono::NaiveTime;
use thiserror::Error;

/// Wire format for times everywhere in this crate
pub const TIME_FMT: &str = "%H:%M";

/// Errors constructing a time window
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("End time {end} must be after start time {start}")]
    Inverted { start: String, end: String },

    #[error("Could not parse '{0}' as HH:MM")]
    Parse(String),
}

/// A contiguous interval of one day, `start < end` by construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    /// Create a window, rejecting `start >= end`
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, WindowError> {
        if start >= end {
            return Err(WindowError::Inverted {
                start: start.format(TIME_FMT).to_string(),
                end: end.format(TIME_FMT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two `HH:MM` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, WindowError> {
        let start = parse_time(start)?;
        let end = parse_time(end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn start_str(&self) -> String {
        self.start.format(TIME_FMT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(TIME_FMT).to_string()
    }

    /// Total available minutes in the window
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether `[start, end]` lies entirely within this window
    pub fn contains(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start <= start && end <= self.end
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_str(), self.end_str())
    }
}

/// Parse an `HH:MM` string into a time of day
pub fn parse_time(s: &str) -> Result<NaiveTime, WindowError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FMT).map_err(|_| WindowError::Parse(s.to_string()))
}
