//! Dayplan - AI-assisted daily schedule planner
//!
//! CLI entry point. Without a subcommand, launches the TUI.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use dayplan::cli::{Cli, Command, OutputFormat, TaskCommand};
use dayplan::config::Config;
use dayplan::domain::TimeWindow;
use dayplan::llm::{LlmClient, create_client};
use dayplan::scheduler::ScheduleGenerator;
use dayplan::store::{PlanningLog, TaskStore};
use dayplan::tui;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dayplan")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Level priority: CLI --log-level > config file > INFO default
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    // Log to a file: the TUI owns the terminal
    let log_file = fs::File::create(log_dir.join("dayplan.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.logging.level.as_deref()).context("Failed to setup logging")?;

    debug!(has_command = cli.command.is_some(), "main: dispatching");
    match cli.command {
        Some(Command::Generate { start, end, format }) => cmd_generate(&config, start, end, format).await,
        Some(Command::Task { command }) => cmd_task(&config, command),
        Some(Command::Logs) => cmd_logs(&config),
        None => cmd_tui(&config).await,
    }
}

/// Build the LLM client when the credential is present
///
/// Absence is not an error: the TUI disables the generate control and the
/// headless command reports "not configured".
fn maybe_client(config: &Config) -> Option<Arc<dyn LlmClient>> {
    if !config.credential_available() {
        info!(
            "{} is not set; scheduling disabled",
            config.llm.api_key_env
        );
        return None;
    }
    match create_client(&config.llm) {
        Ok(client) => {
            debug!(model = %config.llm.model, "maybe_client: LLM client created");
            Some(client)
        }
        Err(e) => {
            info!("LLM client not available ({})", e);
            None
        }
    }
}

/// Launch the TUI
async fn cmd_tui(config: &Config) -> Result<()> {
    debug!("cmd_tui: called");
    let store = TaskStore::open(config.storage.tasks_path());
    let log = PlanningLog::new(config.storage.data_dir());
    let llm = maybe_client(config);

    tui::run(store, log, llm, config).await
}

/// Run one headless generation pass against the saved task list
async fn cmd_generate(
    config: &Config,
    start: Option<String>,
    end: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    debug!(?start, ?end, "cmd_generate: called");
    let start = start.unwrap_or_else(|| config.ui.window_start.clone());
    let end = end.unwrap_or_else(|| config.ui.window_end.clone());
    let window = TimeWindow::parse(&start, &end)?;

    let store = TaskStore::open(config.storage.tasks_path());
    if store.is_empty() {
        println!("No tasks saved. Add some with: dayplan task add <NAME> <MINUTES>");
        return Ok(());
    }

    let log = PlanningLog::new(config.storage.data_dir());
    log.record_request(store.tasks(), &window)?;

    let generator = ScheduleGenerator::new(maybe_client(config), config.llm.max_tokens);

    match generator.generate(store.tasks(), &window).await {
        Ok((entries, message)) => {
            log.record_schedule(&entries, &message)?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
                OutputFormat::Text => {
                    println!("{:<7} {:<7} {:<9} {:<30} {}", "START", "END", "DURATION", "TASK", "PRIORITY");
                    println!("{}", "-".repeat(70));
                    for e in &entries {
                        let duration = e
                            .duration_min()
                            .map(|m| format!("{} min", m))
                            .unwrap_or_else(|| "?".to_string());
                        println!(
                            "{:<7} {:<7} {:<9} {:<30} {}",
                            e.start_time, e.end_time, duration, e.task_name, e.priority
                        );
                    }
                    println!();
                    println!("{}", message);
                }
            }
            Ok(())
        }
        Err(e) => {
            // Failure clears the persisted schedule and reports; the
            // process exits cleanly either way.
            log.record_schedule(&[], &e.to_string())?;
            eprintln!("Scheduling failed: {}", e);
            Ok(())
        }
    }
}

/// Manage the saved task list
fn cmd_task(config: &Config, command: TaskCommand) -> Result<()> {
    debug!(?command, "cmd_task: called");
    let mut store = TaskStore::open(config.storage.tasks_path());

    match command {
        TaskCommand::Add { name, duration, priority } => match store.add(&name, duration, priority) {
            Ok(task) => {
                let line = task.to_string();
                store.persist()?;
                println!("Added: {}", line);
            }
            Err(e) => {
                eprintln!("Invalid task: {}", e);
            }
        },
        TaskCommand::List { format } => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(store.tasks())?);
            }
            OutputFormat::Text => {
                if store.is_empty() {
                    println!("No tasks saved.");
                } else {
                    println!("{:<4} {:<30} {:<10} {}", "#", "NAME", "DURATION", "PRIORITY");
                    println!("{}", "-".repeat(55));
                    for (i, task) in store.tasks().iter().enumerate() {
                        println!(
                            "{:<4} {:<30} {:<10} {}",
                            i + 1,
                            task.name,
                            format!("{} min", task.duration_min),
                            task.priority
                        );
                    }
                }
            }
        },
        TaskCommand::Delete { position } => {
            if position == 0 {
                eprintln!("Positions are 1-based; use the numbers shown by 'task list'");
                return Ok(());
            }
            match store.delete(position - 1) {
                Ok(task) => {
                    store.persist()?;
                    println!("Deleted: {}", task);
                }
                Err(e) => {
                    eprintln!("{}", e);
                }
            }
        }
    }

    Ok(())
}

/// Print the planning-log files
fn cmd_logs(config: &Config) -> Result<()> {
    debug!("cmd_logs: called");
    let log = PlanningLog::new(config.storage.data_dir());

    println!("=== Last planning request ({}) ===", log.request_path().display());
    match log.raw_request() {
        Some(content) => println!("{}", content),
        None => println!("(none)"),
    }

    println!();
    println!("=== Last schedule ({}) ===", log.schedule_path().display());
    match log.raw_schedule() {
        Some(content) => println!("{}", content),
        None => println!("(none)"),
    }

    Ok(())
}
