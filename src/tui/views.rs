//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module draws the UI
//! from AppState but never modifies it.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};
use tracing::trace;

use super::state::{AppState, ConfirmDialog, InteractionMode, View, WindowField};
use crate::domain::Priority;

/// Status colors
mod colors {
    use ratatui::style::Color;

    pub const HIGH: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const MEDIUM: Color = Color::Rgb(255, 215, 0); // Gold
    pub const LOW: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const DIM: Color = Color::DarkGray;
    pub const ERROR: Color = Color::Rgb(220, 20, 60);
    pub const OK: Color = Color::Rgb(50, 205, 50); // Lime green
}

/// Get color for a priority tier
fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => colors::HIGH,
        Priority::Medium => colors::MEDIUM,
        Priority::Low => colors::LOW,
    }
}

/// Spinner frames shown while a generation call is in flight
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Main render function
pub fn render(state: &AppState, frame: &mut Frame) {
    trace!(?state.current_view, "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    match state.current_view {
        View::Tasks => render_tasks_view(state, frame, chunks[1]),
        View::Schedule => render_schedule_view(state, frame, chunks[1]),
        View::Logs => render_logs_view(state, frame, chunks[1]),
    }

    render_footer(state, frame, chunks[2]);

    match &state.interaction_mode {
        InteractionMode::Help => render_help_overlay(frame, frame.area()),
        InteractionMode::Confirm(dialog) => render_confirm_dialog(dialog, frame, frame.area()),
        _ => {}
    }
}

/// Render header with view tabs, window, and credential state
fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let mut left_spans = vec![Span::styled(
        " Dayplan",
        Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
    )];
    left_spans.push(Span::styled(" │ ", Style::default().fg(colors::DIM)));

    for (i, view) in [View::Tasks, View::Schedule, View::Logs].into_iter().enumerate() {
        if i > 0 {
            left_spans.push(Span::styled(" · ", Style::default().fg(colors::DIM)));
        }
        if view == state.current_view {
            left_spans.push(Span::styled(
                view.title(),
                Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
            ));
        } else {
            left_spans.push(Span::styled(view.title(), Style::default().fg(colors::DIM)));
        }
    }

    // Right side: window + credential indicator
    let window_ok = state.window().is_ok();
    let window_text = format!("{}-{}", state.window_start, state.window_end);
    let (ai_icon_color, ai_text) = if state.credential_available {
        (colors::OK, "AI ready")
    } else {
        (colors::ERROR, "AI off")
    };

    let right_spans = vec![
        Span::styled(
            window_text,
            if window_ok {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(colors::ERROR)
            },
        ),
        Span::styled(" │ ", Style::default().fg(colors::DIM)),
        Span::styled("● ", Style::default().fg(ai_icon_color)),
        Span::raw(ai_text),
        Span::raw(" "),
    ];

    let inner_width = area.width.saturating_sub(2) as usize;
    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let padding = inner_width.saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    if padding > 0 {
        spans.push(Span::raw(" ".repeat(padding)));
    }
    spans.extend(right_spans);

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Render the task list table
fn render_tasks_view(state: &AppState, frame: &mut Frame, area: Rect) {
    let rows: Vec<Row> = state
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let row_style = if i == state.task_selection {
                Style::default().bg(colors::SELECTED_BG)
            } else {
                Style::default()
            };

            Row::new(vec![
                Line::raw(format!("{}", i + 1)),
                Line::raw(task.name.clone()),
                Line::raw(format!("{} min", task.duration_min)),
                Line::styled(task.priority.to_string(), Style::default().fg(priority_color(task.priority))),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),  // #
        Constraint::Min(20),    // NAME
        Constraint::Length(10), // DURATION
        Constraint::Length(8),  // PRIORITY
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "NAME", "DURATION", "PRIORITY"])
                .style(Style::default().add_modifier(Modifier::BOLD).fg(colors::HEADER)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Tasks ({}) ", state.tasks.len()))
                .border_style(Style::default().fg(colors::HEADER)),
        );

    frame.render_widget(table, area);

    if state.tasks.is_empty() {
        render_empty_message(frame, area, "No tasks yet. Press [a] to add one.");
    }
}

/// Render the schedule view: table, timeline, distribution, metrics
fn render_schedule_view(state: &AppState, frame: &mut Frame, area: Rect) {
    if state.schedule.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Schedule ")
            .border_style(Style::default().fg(colors::HEADER));
        frame.render_widget(block, area);
        let hint = if state.generating {
            "Generating..."
        } else {
            "No schedule yet. Press [g] to generate one from your tasks."
        };
        render_empty_message(frame, area, hint);
        return;
    }

    let timeline_height = state.schedule.len() as u16 + 3; // entries + axis + borders
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(state.schedule.len() as u16 + 3), // Table
            Constraint::Length(timeline_height),              // Timeline
            Constraint::Length(7),                            // Distribution + metrics
        ])
        .split(area);

    render_schedule_table(state, frame, chunks[0]);
    render_timeline(state, frame, chunks[1]);
    render_analytics(state, frame, chunks[2]);
}

fn render_schedule_table(state: &AppState, frame: &mut Frame, area: Rect) {
    let rows: Vec<Row> = state
        .schedule
        .iter()
        .map(|entry| {
            let duration = entry
                .duration_min()
                .map(|m| format!("{} min", m))
                .unwrap_or_else(|| "?".to_string());

            Row::new(vec![
                Line::raw(entry.start_time.clone()),
                Line::raw(entry.end_time.clone()),
                Line::raw(duration),
                Line::raw(entry.task_name.clone()),
                Line::styled(
                    entry.priority.to_string(),
                    Style::default().fg(priority_color(entry.priority)),
                ),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(7),  // START
        Constraint::Length(7),  // END
        Constraint::Length(9),  // DURATION
        Constraint::Min(20),    // TASK
        Constraint::Length(8),  // PRIORITY
    ];

    let title = match &state.status_message {
        Some(msg) => format!(" Schedule — {} ", msg),
        None => " Schedule ".to_string(),
    };

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["START", "END", "DURATION", "TASK", "PRIORITY"])
                .style(Style::default().add_modifier(Modifier::BOLD).fg(colors::HEADER)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(colors::HEADER)),
        );

    frame.render_widget(table, area);
}

/// Render the timeline: one horizontal bar per entry, positioned by its
/// start/end within the window and colored by priority
fn render_timeline(state: &AppState, frame: &mut Frame, area: Rect) {
    let Ok(window) = state.window() else {
        return;
    };
    let total = window.minutes();

    // Label column: "HH:MM-HH:MM " = 12 chars
    const LABEL_WIDTH: usize = 12;
    let inner_width = area.width.saturating_sub(2) as usize;
    let chart_width = inner_width.saturating_sub(LABEL_WIDTH).max(1);

    let mut lines: Vec<Line> = Vec::with_capacity(state.schedule.len() + 1);

    for entry in &state.schedule {
        let (Ok(start), Ok(end)) = (entry.start(), entry.end()) else {
            continue;
        };
        let start_min = (start - window.start()).num_minutes();
        let end_min = (end - window.start()).num_minutes();
        let (offset, len) = bar_extent(start_min, end_min, total, chart_width);

        let color = state
            .tasks
            .iter()
            .find(|t| t.name == entry.task_name)
            .map(|t| t.priority)
            .map(priority_color)
            .unwrap_or_else(|| priority_color(entry.priority));

        lines.push(Line::from(vec![
            Span::styled(
                format!("{}-{} ", entry.start_time, entry.end_time),
                Style::default().fg(colors::DIM),
            ),
            Span::raw(" ".repeat(offset)),
            Span::styled("█".repeat(len), Style::default().fg(color)),
            Span::raw(" "),
            Span::raw(truncate(&entry.task_name, chart_width.saturating_sub(offset + len + 1))),
        ]));
    }

    // Axis line with the window bounds at each end
    let start_label = window.start_str();
    let end_label = window.end_str();
    let axis_fill = chart_width.saturating_sub(start_label.len() + end_label.len());
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH)),
        Span::styled(
            format!("{}{}{}", start_label, "·".repeat(axis_fill), end_label),
            Style::default().fg(colors::DIM),
        ),
    ]));

    let timeline = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Timeline ")
            .border_style(Style::default().fg(colors::HEADER)),
    );

    frame.render_widget(timeline, area);
}

/// Render distribution bars and numeric metrics side by side
fn render_analytics(state: &AppState, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_distribution(state, frame, chunks[0]);
    render_metrics(state, frame, chunks[1]);
}

/// Total scheduled minutes per priority as proportional bars
fn render_distribution(state: &AppState, frame: &mut Frame, area: Rect) {
    let totals = state.distribution();
    let scheduled = state.scheduled_minutes().max(1);
    let inner_width = area.width.saturating_sub(2) as usize;
    // "medium  " label + trailing " 120 min (80.0%)" annotation
    let bar_budget = inner_width.saturating_sub(28).max(4);

    let lines: Vec<Line> = totals
        .iter()
        .map(|(priority, minutes)| {
            let share = *minutes as f64 / scheduled as f64;
            let len = (share * bar_budget as f64).round() as usize;
            let annotation = if *minutes > 0 {
                format!(" {} min ({:.1}%)", minutes, share * 100.0)
            } else {
                " —".to_string()
            };

            Line::from(vec![
                Span::styled(format!("{:<7}", priority.to_string()), Style::default().fg(colors::DIM)),
                Span::styled("█".repeat(len), Style::default().fg(priority_color(*priority))),
                Span::styled(annotation, Style::default().fg(Color::White)),
            ])
        })
        .collect();

    let distribution = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Time by Priority ")
            .border_style(Style::default().fg(colors::HEADER)),
    );

    frame.render_widget(distribution, area);
}

/// Numeric metrics: available, scheduled, utilization
fn render_metrics(state: &AppState, frame: &mut Frame, area: Rect) {
    let available = state.available_minutes();
    let scheduled = state.scheduled_minutes();

    let lines = vec![
        Line::from(vec![
            Span::styled("Available:   ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format_minutes(available)),
        ]),
        Line::from(vec![
            Span::styled("Scheduled:   ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format_minutes(scheduled)),
        ]),
        Line::from(vec![
            Span::styled("Utilization: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("{:.1}%", state.utilization()),
                Style::default().fg(colors::OK),
            ),
        ]),
    ];

    let metrics = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Metrics ")
            .border_style(Style::default().fg(colors::HEADER)),
    );

    frame.render_widget(metrics, area);
}

/// Render the planning-log inspection view
fn render_logs_view(state: &AppState, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let request = state.raw_request_log.as_deref().unwrap_or("(no request logged yet)");
    let schedule = state.raw_schedule_log.as_deref().unwrap_or("(no schedule logged yet)");

    let request_view = Paragraph::new(request)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Last Planning Request ")
                .border_style(Style::default().fg(colors::HEADER)),
        );
    let schedule_view = Paragraph::new(schedule)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Last Schedule ")
                .border_style(Style::default().fg(colors::HEADER)),
        );

    frame.render_widget(request_view, chunks[0]);
    frame.render_widget(schedule_view, chunks[1]);
}

/// Render footer: active input prompt, error, spinner, or keybinds
fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let content = match &state.interaction_mode {
        InteractionMode::TaskName(buf) => input_line("Task name: ", buf, "(Enter to continue, Esc to cancel)"),
        InteractionMode::TaskDuration { buf, .. } => {
            input_line("Duration (min): ", buf, "(Enter to continue, Esc to cancel)")
        }
        InteractionMode::TaskPriority { selected, .. } => Line::from(vec![
            Span::styled(
                "Priority: ",
                Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("< {} >", selected),
                Style::default().fg(priority_color(*selected)).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  (↑/↓ to change, Enter to add, Esc to cancel)",
                Style::default().fg(colors::DIM),
            ),
        ]),
        InteractionMode::WindowInput { field, buf } => {
            let label = match field {
                WindowField::Start => "Window start (HH:MM): ",
                WindowField::End => "Window end (HH:MM): ",
            };
            input_line(label, buf, "(Enter to confirm, Esc to cancel)")
        }
        _ => {
            if let Some(ref error) = state.error_message {
                Line::from(Span::styled(
                    format!(" Error: {}", error),
                    Style::default().fg(colors::ERROR),
                ))
            } else if state.generating {
                let spinner = SPINNER[state.spinner_frame % SPINNER.len()];
                let elapsed = state
                    .generating_since
                    .map(|t| format!(" · {}s", t.elapsed().as_secs()))
                    .unwrap_or_default();
                Line::from(Span::styled(
                    format!(" {} Optimizing your schedule...{}", spinner, elapsed),
                    Style::default().fg(colors::MEDIUM),
                ))
            } else {
                keybind_line(state)
            }
        }
    };

    let footer = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn input_line<'a>(label: &'a str, buf: &'a str, hint: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD)),
        Span::raw(buf),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        Span::styled(format!("  {}", hint), Style::default().fg(colors::DIM)),
    ])
}

/// Context-sensitive keybinds for the current view
fn keybind_line(state: &AppState) -> Line<'static> {
    let mut keybinds: Vec<(&str, &str)> = match state.current_view {
        View::Tasks => vec![("[a]", "Add"), ("[d]", "Delete"), ("[w]", "Window")],
        View::Schedule => vec![("[w]", "Window")],
        View::Logs => vec![],
    };
    keybinds.push(("[g]", "Generate"));
    keybinds.push(("[Tab]", "Views"));
    keybinds.push(("[?]", "Help"));
    keybinds.push(("[q]", "Quit"));

    let generate_allowed = state.can_generate();
    let mut spans = vec![Span::raw(" ")];
    for (key, action) in keybinds {
        let style = if key == "[g]" && !generate_allowed {
            // Disabled control renders dim
            Style::default().fg(colors::DIM)
        } else {
            Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(key.to_string(), style));
        spans.push(Span::raw(format!(" {} ", action)));
    }

    Line::from(spans)
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled("Global", Style::default().add_modifier(Modifier::BOLD))]),
        key_line("Tab", "Cycle views (Tasks → Schedule → Logs)"),
        key_line("1/2/3", "Jump to a view"),
        key_line("g", "Generate schedule (needs tasks, window, API key)"),
        key_line("?", "Toggle help"),
        key_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Tasks View",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        key_line("a", "Add a task (name → duration → priority)"),
        key_line("d", "Delete the selected task"),
        key_line("j/↓ k/↑", "Move selection"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Time Window",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        key_line("w", "Edit window start, then end (HH:MM)"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (? to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Helper to create a key binding line
fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

/// Render confirmation dialog
fn render_confirm_dialog(dialog: &ConfirmDialog, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);

    let yes_style = if dialog.selected_button {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let no_style = if !dialog.selected_button {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red)
    };

    let content = vec![
        Line::from(""),
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::raw("       "),
            Span::styled(" No ", no_style),
            Span::raw("    "),
            Span::styled(" Yes ", yes_style),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Tab/←→: switch  Enter: confirm  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )]),
    ];

    let dialog_widget = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(dialog_widget, popup_area);
}

/// Render empty state message
fn render_empty_message(frame: &mut Frame, area: Rect, message: &str) {
    let inner = area.inner(ratatui::layout::Margin {
        horizontal: 2,
        vertical: 2,
    });

    let empty = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(empty, inner);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Map an entry's minutes-from-window-start interval onto chart columns
///
/// Returns (offset, length); length is at least 1 so short entries stay
/// visible.
fn bar_extent(start_min: i64, end_min: i64, total_min: i64, width: usize) -> (usize, usize) {
    if total_min <= 0 || width == 0 {
        return (0, 1);
    }
    let scale = width as f64 / total_min as f64;
    let offset = ((start_min.max(0) as f64) * scale).floor() as usize;
    let end_col = ((end_min.max(0) as f64) * scale).ceil() as usize;
    let offset = offset.min(width.saturating_sub(1));
    let len = end_col.saturating_sub(offset).clamp(1, width - offset);
    (offset, len)
}

/// Truncate a string for display
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Format minutes as "Xh Ym"
fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}
