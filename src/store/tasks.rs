//! Persistent task list
//!
//! An in-memory ordered list of tasks backed by a single JSON file.
//! Loading tolerates a missing or corrupt file (empty list); writes are
//! whole-file overwrites.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::{debug, warn};

use crate::domain::{Priority, Task, TaskError};

/// Ordered task list with JSON file persistence
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Open a store at the given path, loading any existing task file
    ///
    /// A missing file yields an empty list. An unparseable file also yields
    /// an empty list (with a warning) rather than an error — the next
    /// persist will replace it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tasks = load_tasks(&path);
        debug!(?path, count = tasks.len(), "TaskStore::open: loaded");
        Self { path, tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validate and append a task; the list is unchanged on error
    pub fn add(&mut self, name: &str, duration_min: u32, priority: Priority) -> Result<&Task, TaskError> {
        let task = Task::new(name, duration_min, priority)?;
        debug!(%task, "TaskStore::add: appending");
        self.tasks.push(task);
        Ok(self.tasks.last().expect("just pushed"))
    }

    /// Remove and return the task at `index`; out of range leaves the list
    /// unchanged
    pub fn delete(&mut self, index: usize) -> Result<Task, TaskError> {
        if index >= self.tasks.len() {
            return Err(TaskError::IndexOutOfRange {
                index,
                len: self.tasks.len(),
            });
        }
        let task = self.tasks.remove(index);
        debug!(%task, index, "TaskStore::delete: removed");
        Ok(task)
    }

    /// Write the full list to disk, creating parent directories as needed
    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create task store directory")?;
        }
        let json = serde_json::to_string_pretty(&self.tasks).context("Failed to serialize tasks")?;
        fs::write(&self.path, json).with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = ?self.path, count = self.tasks.len(), "TaskStore::persist: wrote");
        Ok(())
    }
}

fn load_tasks(path: &Path) -> Vec<Task> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => {
            debug!(?path, "load_tasks: no task file, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(?path, error = %e, "load_tasks: corrupt task file, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> TaskStore {
        TaskStore::open(dir.path().join("tasks.json"))
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json!").unwrap();

        let store = TaskStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_appends_in_order() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.add("Write report", 120, Priority::High).unwrap();
        store.add("Email replies", 30, Priority::Low).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].name, "Write report");
        assert_eq!(store.tasks()[1].name, "Email replies");
    }

    #[test]
    fn test_add_invalid_leaves_list_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add("Keep me", 10, Priority::Medium).unwrap();

        assert_eq!(store.add("", 30, Priority::Low), Err(TaskError::EmptyName));
        assert_eq!(
            store.add("Too long", 9999, Priority::Low),
            Err(TaskError::InvalidDuration(9999))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add("a", 10, Priority::Low).unwrap();
        store.add("b", 20, Priority::Medium).unwrap();
        store.add("c", 30, Priority::High).unwrap();

        let removed = store.delete(1).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(store.tasks()[0].name, "a");
        assert_eq!(store.tasks()[1].name, "c");
    }

    #[test]
    fn test_delete_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add("only", 10, Priority::Low).unwrap();

        assert_eq!(store.delete(1), Err(TaskError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_persist_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        let mut store = TaskStore::open(&path);
        store.add("Write report", 120, Priority::High).unwrap();
        store.add("Email replies", 30, Priority::Low).unwrap();
        store.persist().unwrap();

        let reloaded = TaskStore::open(&path);
        assert_eq!(reloaded.tasks(), store.tasks());
    }

    #[test]
    fn test_persist_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("tasks.json");

        let mut store = TaskStore::open(&path);
        store.add("x", 5, Priority::Low).unwrap();
        store.persist().unwrap();

        assert!(path.exists());
    }
}
