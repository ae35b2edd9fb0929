//! TUI application - event handling and state management
//!
//! The App struct owns the AppState and handles all keyboard events. It
//! mutates state only; rendering is the views module, IO is the runner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::state::{AppState, ConfirmAction, ConfirmDialog, InteractionMode, PendingAction, View, WindowField};
use crate::domain::{MAX_DURATION_MIN, Priority};

/// TUI application
#[derive(Debug)]
pub struct App {
    state: AppState,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, mode = ?self.state.interaction_mode, "App::handle_key: called");
        // Transient errors clear on the next key press
        self.state.clear_error();

        match self.state.interaction_mode.clone() {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::TaskName(buf) => self.handle_task_name_key(key, buf),
            InteractionMode::TaskDuration { name, buf } => self.handle_task_duration_key(key, name, buf),
            InteractionMode::TaskPriority {
                name,
                duration_min,
                selected,
            } => self.handle_task_priority_key(key, name, duration_min, selected),
            InteractionMode::WindowInput { field, buf } => self.handle_window_key(key, field, buf),
            InteractionMode::Confirm(dialog) => self.handle_confirm_key(key, dialog),
            InteractionMode::Help => self.handle_help_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            // === Quit ===
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                debug!("App::handle_normal_key: Ctrl+C force quit");
                return true;
            }
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                self.state.should_quit = true;
            }

            // === Help ===
            (KeyCode::Char('?'), _) | (KeyCode::F(1), _) => {
                self.state.interaction_mode = InteractionMode::Help;
            }

            // === View navigation ===
            (KeyCode::Tab, _) => {
                self.state.current_view = self.state.current_view.next();
            }
            (KeyCode::BackTab, _) => {
                self.state.current_view = self.state.current_view.prev();
            }
            (KeyCode::Char('1'), _) => self.state.current_view = View::Tasks,
            (KeyCode::Char('2'), _) => self.state.current_view = View::Schedule,
            (KeyCode::Char('3'), _) => self.state.current_view = View::Logs,

            // === Task list navigation ===
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) if self.state.current_view == View::Tasks => {
                self.state.select_prev_task();
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) if self.state.current_view == View::Tasks => {
                self.state.select_next_task();
            }

            // === Add task (three-stage form) ===
            (KeyCode::Char('a'), _) if !self.state.generating => {
                self.state.current_view = View::Tasks;
                self.state.interaction_mode = InteractionMode::TaskName(String::new());
            }

            // === Delete selected task ===
            (KeyCode::Char('d'), _) if self.state.current_view == View::Tasks && !self.state.generating => {
                let idx = self.state.task_selection;
                if let Some(task) = self.state.tasks.get(idx) {
                    self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::delete_task(idx, task));
                } else {
                    self.state.set_error("No task selected");
                }
            }

            // === Edit time window ===
            (KeyCode::Char('w'), _) if !self.state.generating => {
                let buf = self.state.window_start.clone();
                self.state.interaction_mode = InteractionMode::WindowInput {
                    field: WindowField::Start,
                    buf,
                };
            }

            // === Generate schedule ===
            (KeyCode::Char('g'), _) => {
                if self.state.can_generate() {
                    debug!("App::handle_normal_key: queueing Generate");
                    self.state.pending_action = Some(PendingAction::Generate);
                } else if let Some(reason) = self.state.generate_blocker() {
                    self.state.set_error(reason);
                }
            }

            _ => {
                debug!("App::handle_normal_key: unhandled key");
            }
        }

        false
    }

    fn handle_task_name_key(&mut self, key: KeyEvent, mut buf: String) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => {
                if buf.trim().is_empty() {
                    self.state.set_error("Task name must not be empty");
                    self.state.interaction_mode = InteractionMode::TaskName(buf);
                } else {
                    self.state.interaction_mode = InteractionMode::TaskDuration {
                        name: buf.trim().to_string(),
                        buf: String::new(),
                    };
                }
            }
            KeyCode::Backspace => {
                buf.pop();
                self.state.interaction_mode = InteractionMode::TaskName(buf);
            }
            KeyCode::Char(c) => {
                buf.push(c);
                self.state.interaction_mode = InteractionMode::TaskName(buf);
            }
            _ => {}
        }

        false
    }

    fn handle_task_duration_key(&mut self, key: KeyEvent, name: String, mut buf: String) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => match buf.parse::<u32>() {
                Ok(minutes) if (1..=MAX_DURATION_MIN).contains(&minutes) => {
                    self.state.interaction_mode = InteractionMode::TaskPriority {
                        name,
                        duration_min: minutes,
                        selected: Priority::Medium,
                    };
                }
                _ => {
                    self.state
                        .set_error(format!("Duration must be 1-{} minutes", MAX_DURATION_MIN));
                    self.state.interaction_mode = InteractionMode::TaskDuration { name, buf };
                }
            },
            KeyCode::Backspace => {
                buf.pop();
                self.state.interaction_mode = InteractionMode::TaskDuration { name, buf };
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                buf.push(c);
                self.state.interaction_mode = InteractionMode::TaskDuration { name, buf };
            }
            _ => {
                self.state.interaction_mode = InteractionMode::TaskDuration { name, buf };
            }
        }

        false
    }

    fn handle_task_priority_key(&mut self, key: KeyEvent, name: String, duration_min: u32, selected: Priority) -> bool {
        let cycle = |p: Priority, up: bool| -> Priority {
            // Display order: High, Medium, Low
            match (p, up) {
                (Priority::High, true) => Priority::Low,
                (Priority::Medium, true) => Priority::High,
                (Priority::Low, true) => Priority::Medium,
                (Priority::High, false) => Priority::Medium,
                (Priority::Medium, false) => Priority::Low,
                (Priority::Low, false) => Priority::High,
            }
        };

        match key.code {
            KeyCode::Esc => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => {
                debug!(%name, duration_min, %selected, "App: queueing AddTask");
                self.state.pending_action = Some(PendingAction::AddTask {
                    name,
                    duration_min,
                    priority: selected,
                });
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Left => {
                self.state.interaction_mode = InteractionMode::TaskPriority {
                    name,
                    duration_min,
                    selected: cycle(selected, true),
                };
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Right => {
                self.state.interaction_mode = InteractionMode::TaskPriority {
                    name,
                    duration_min,
                    selected: cycle(selected, false),
                };
            }
            _ => {
                self.state.interaction_mode = InteractionMode::TaskPriority {
                    name,
                    duration_min,
                    selected,
                };
            }
        }

        false
    }

    fn handle_window_key(&mut self, key: KeyEvent, field: WindowField, mut buf: String) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => match field {
                WindowField::Start => {
                    if crate::domain::parse_time(&buf).is_err() {
                        self.state.set_error(format!("'{}' is not a valid HH:MM time", buf));
                        self.state.interaction_mode = InteractionMode::WindowInput { field, buf };
                    } else {
                        self.state.window_start = buf.trim().to_string();
                        let end_buf = self.state.window_end.clone();
                        self.state.interaction_mode = InteractionMode::WindowInput {
                            field: WindowField::End,
                            buf: end_buf,
                        };
                    }
                }
                WindowField::End => {
                    match crate::domain::TimeWindow::parse(&self.state.window_start, &buf) {
                        Ok(_) => {
                            self.state.window_end = buf.trim().to_string();
                            self.state.interaction_mode = InteractionMode::Normal;
                        }
                        Err(e) => {
                            self.state.set_error(e.to_string());
                            self.state.interaction_mode = InteractionMode::WindowInput { field, buf };
                        }
                    }
                }
            },
            KeyCode::Backspace => {
                buf.pop();
                self.state.interaction_mode = InteractionMode::WindowInput { field, buf };
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => {
                buf.push(c);
                self.state.interaction_mode = InteractionMode::WindowInput { field, buf };
            }
            _ => {
                self.state.interaction_mode = InteractionMode::WindowInput { field, buf };
            }
        }

        false
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, mut dialog: ConfirmDialog) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => {
                if dialog.selected_button {
                    match dialog.action {
                        ConfirmAction::DeleteTask(index) => {
                            debug!(index, "App: queueing DeleteTask");
                            self.state.pending_action = Some(PendingAction::DeleteTask(index));
                        }
                    }
                }
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                dialog.selected_button = !dialog.selected_button;
                self.state.interaction_mode = InteractionMode::Confirm(dialog);
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                dialog.selected_button = true;
                self.state.interaction_mode = InteractionMode::Confirm(dialog);
            }
            _ => {
                self.state.interaction_mode = InteractionMode::Confirm(dialog);
            }
        }

        false
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {}
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;

    fn app() -> App {
        App::new(AppState::new("09:00".to_string(), "17:00".to_string(), true))
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::from(KeyCode::Char(c))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(c));
        }
    }

    #[test]
    fn test_ctrl_c_force_quits() {
        let mut app = app();
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_q_sets_should_quit() {
        let mut app = app();
        assert!(!app.handle_key(key('q')));
        assert!(app.state().should_quit);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = app();
        app.handle_key(key('?'));
        assert_eq!(app.state().interaction_mode, InteractionMode::Help);
        app.handle_key(key('?'));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
    }

    #[test]
    fn test_tab_cycles_views() {
        let mut app = app();
        assert_eq!(app.state().current_view, View::Tasks);
        app.handle_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(app.state().current_view, View::Schedule);
        app.handle_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(app.state().current_view, View::Logs);
        app.handle_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(app.state().current_view, View::Tasks);
    }

    #[test]
    fn test_add_task_full_flow() {
        let mut app = app();

        app.handle_key(key('a'));
        assert!(matches!(app.state().interaction_mode, InteractionMode::TaskName(_)));

        type_str(&mut app, "Write report");
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert!(matches!(app.state().interaction_mode, InteractionMode::TaskDuration { .. }));

        type_str(&mut app, "120");
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert!(matches!(app.state().interaction_mode, InteractionMode::TaskPriority { .. }));

        // Default Medium, one step up is High
        app.handle_key(KeyEvent::from(KeyCode::Up));
        app.handle_key(KeyEvent::from(KeyCode::Enter));

        assert_eq!(
            app.state().pending_action,
            Some(PendingAction::AddTask {
                name: "Write report".to_string(),
                duration_min: 120,
                priority: Priority::High,
            })
        );
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
    }

    #[test]
    fn test_add_task_empty_name_rejected() {
        let mut app = app();
        app.handle_key(key('a'));
        app.handle_key(KeyEvent::from(KeyCode::Enter));

        assert!(app.state().error_message.is_some());
        assert!(matches!(app.state().interaction_mode, InteractionMode::TaskName(_)));
    }

    #[test]
    fn test_add_task_invalid_duration_rejected() {
        let mut app = app();
        app.handle_key(key('a'));
        type_str(&mut app, "Nap");
        app.handle_key(KeyEvent::from(KeyCode::Enter));

        // Non-digit input is ignored entirely
        app.handle_key(key('x'));
        if let InteractionMode::TaskDuration { buf, .. } = &app.state().interaction_mode {
            assert!(buf.is_empty());
        } else {
            panic!("expected TaskDuration mode");
        }

        type_str(&mut app, "0");
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert!(app.state().error_message.is_some());
        assert!(matches!(app.state().interaction_mode, InteractionMode::TaskDuration { .. }));
    }

    #[test]
    fn test_add_task_escape_cancels() {
        let mut app = app();
        app.handle_key(key('a'));
        type_str(&mut app, "Half-typed");
        app.handle_key(KeyEvent::from(KeyCode::Esc));

        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
        assert!(app.state().pending_action.is_none());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app();
        app.state_mut().tasks.push(Task::new("Doomed", 30, Priority::Low).unwrap());

        app.handle_key(key('d'));
        assert!(matches!(app.state().interaction_mode, InteractionMode::Confirm(_)));

        // Enter with No selected: nothing queued
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert!(app.state().pending_action.is_none());

        // Again, select Yes this time
        app.handle_key(key('d'));
        app.handle_key(key('y'));
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.state().pending_action, Some(PendingAction::DeleteTask(0)));
    }

    #[test]
    fn test_delete_with_no_tasks_errors() {
        let mut app = app();
        app.handle_key(key('d'));
        assert!(app.state().error_message.is_some());
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
    }

    #[test]
    fn test_window_edit_flow() {
        let mut app = app();
        app.handle_key(key('w'));

        // Clear the prefilled start and type a new one
        for _ in 0..5 {
            app.handle_key(KeyEvent::from(KeyCode::Backspace));
        }
        type_str(&mut app, "08:30");
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.state().window_start, "08:30");

        // Now the end field, prefilled with 17:00; accept it
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
        assert_eq!(app.state().window().unwrap().minutes(), 510);
    }

    #[test]
    fn test_window_rejects_inverted() {
        let mut app = app();
        app.handle_key(key('w'));
        app.handle_key(KeyEvent::from(KeyCode::Enter)); // keep 09:00 start

        for _ in 0..5 {
            app.handle_key(KeyEvent::from(KeyCode::Backspace));
        }
        type_str(&mut app, "08:00");
        app.handle_key(KeyEvent::from(KeyCode::Enter));

        assert!(app.state().error_message.is_some());
        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::WindowInput { .. }
        ));
        // Committed state unchanged
        assert_eq!(app.state().window_end, "17:00");
    }

    #[test]
    fn test_generate_queues_when_eligible() {
        let mut app = app();
        app.state_mut().tasks.push(Task::new("x", 30, Priority::Low).unwrap());

        app.handle_key(key('g'));
        assert_eq!(app.state().pending_action, Some(PendingAction::Generate));
    }

    #[test]
    fn test_generate_blocked_without_credential() {
        let mut app = App::new(AppState::new("09:00".to_string(), "17:00".to_string(), false));
        app.state_mut().tasks.push(Task::new("x", 30, Priority::Low).unwrap());

        app.handle_key(key('g'));
        assert!(app.state().pending_action.is_none());
        assert!(app.state().error_message.as_ref().unwrap().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_generate_blocked_with_empty_tasks() {
        let mut app = app();
        app.handle_key(key('g'));
        assert!(app.state().pending_action.is_none());
        assert!(app.state().error_message.is_some());
    }

    #[test]
    fn test_generate_blocked_while_generating() {
        let mut app = app();
        app.state_mut().tasks.push(Task::new("x", 30, Priority::Low).unwrap());
        app.state_mut().generating = true;

        app.handle_key(key('g'));
        assert!(app.state().pending_action.is_none());
    }

    #[test]
    fn test_inputs_locked_while_generating() {
        let mut app = app();
        app.state_mut().tasks.push(Task::new("x", 30, Priority::Low).unwrap());
        app.state_mut().generating = true;

        app.handle_key(key('a'));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);

        app.handle_key(key('d'));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);

        app.handle_key(key('w'));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
    }
}
