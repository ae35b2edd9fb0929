//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Priority;

/// Dayplan - AI-assisted daily schedule planner
#[derive(Parser)]
#[command(name = "dayplan", about = "Plan your day: tasks in, optimized schedule out", version)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a schedule from the saved task list (headless)
    Generate {
        /// Window start time (HH:MM); defaults to the configured value
        #[arg(short, long)]
        start: Option<String>,

        /// Window end time (HH:MM); defaults to the configured value
        #[arg(short, long)]
        end: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage the saved task list
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Print the planning-log files
    Logs,
}

/// Task list management subcommands
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        /// Task name
        name: String,

        /// Estimated duration in minutes (1-1440)
        duration: u32,

        /// Priority (high, medium, low)
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },

    /// List all tasks
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a task by its position (1-based, as shown by list)
    Delete {
        /// Task position
        position: usize,
    },
}

/// Output format for list/generate commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
