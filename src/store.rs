//! Task storage for task
//!
//! [`JsonStore`] keeps every task in memory and rewrites the whole collection
//! to a single JSON file after each mutation.
//!
//! # File format
//!
//! ```text
//! {
//!   "1": { "id": 1, "title": "Buy milk", "priority": 1, ... },
//!   "4": { "id": 4, "title": "Ship release", "priority": 3, ... }
//! }
//! ```
//!
//! # Consistency
//!
//! One `RwLock` guards the collection. Reads take it shared. Writes hold it
//! exclusively across both the in-memory change and the file write, so the
//! file always matches the state produced by the write that produced it. If
//! the file write fails the in-memory change is undone before the error is
//! returned.
//!
//! There is no cross-process locking. The full rewrite per mutation costs
//! O(tasks) I/O, which is fine for a personal list and nothing bigger.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::atomic;
use crate::error::{Error, Result};
use crate::model::Task;

/// Operations the command layer performs against task storage.
pub trait TaskRepository: Send + Sync {
    /// Assign the next unused ID to `task`, store a copy, and persist.
    ///
    /// Returns the assigned ID. IDs are never reused, even after deletes.
    fn add_task(&self, task: &mut Task) -> Result<u64>;

    /// Snapshot of every task. Order is not part of the contract.
    fn list_all_tasks(&self) -> Vec<Task>;

    fn get_task_by_id(&self, id: u64) -> Option<Task>;

    /// Replace the stored task with the same ID and persist.
    ///
    /// Fails with [`Error::TaskNotFound`] when no such task exists.
    fn update_task(&self, task: &Task) -> Result<()>;

    /// Remove the task if present and persist. A missing ID is not an error.
    fn delete_task(&self, id: u64) -> Result<()>;
}

#[derive(Debug)]
struct StoreState {
    tasks: BTreeMap<u64, Task>,
    /// Next ID to hand out. Only ever increases.
    next_id: u64,
}

/// File-backed task repository.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl JsonStore {
    /// Open the store at `path`, creating its directory if needed.
    ///
    /// A missing or blank file gives an empty store. Unreadable or malformed
    /// files are an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tasks = load_tasks(&path)?;
        let next_id = match tasks.keys().next_back() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or_else(|| Error::CorruptStore {
                path: path.clone(),
                reason: format!("task ID {max} leaves no room for new IDs"),
            })?,
        };
        debug!(
            path = %path.display(),
            tasks = tasks.len(),
            next_id,
            "opened task store"
        );

        Ok(Self {
            path,
            state: RwLock::new(StoreState { tasks, next_id }),
        })
    }

    /// Path to the backing JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Every mutation restores the previous state before returning, so a
    // poisoned lock still guards a consistent collection.
    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, tasks: &BTreeMap<u64, Task>) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        atomic::write_atomic_str(&self.path, &json)?;
        debug!(path = %self.path.display(), tasks = tasks.len(), "persisted tasks");
        Ok(())
    }
}

impl TaskRepository for JsonStore {
    fn add_task(&self, task: &mut Task) -> Result<u64> {
        let mut state = self.write_state();
        let id = state.next_id;
        state.next_id = id
            .checked_add(1)
            .ok_or_else(|| Error::OperationFailed("task IDs exhausted".to_string()))?;

        task.id = id;
        state.tasks.insert(id, task.clone());

        if let Err(err) = self.persist(&state.tasks) {
            state.tasks.remove(&id);
            task.id = 0;
            warn!(id, error = %err, "add rolled back after failed write");
            return Err(err);
        }
        Ok(id)
    }

    fn list_all_tasks(&self) -> Vec<Task> {
        self.read_state().tasks.values().cloned().collect()
    }

    fn get_task_by_id(&self, id: u64) -> Option<Task> {
        self.read_state().tasks.get(&id).cloned()
    }

    fn update_task(&self, task: &Task) -> Result<()> {
        let mut state = self.write_state();
        let previous = match state.tasks.get_mut(&task.id) {
            Some(slot) => std::mem::replace(slot, task.clone()),
            None => return Err(Error::TaskNotFound(task.id)),
        };

        if let Err(err) = self.persist(&state.tasks) {
            state.tasks.insert(task.id, previous);
            warn!(id = task.id, error = %err, "update rolled back after failed write");
            return Err(err);
        }
        Ok(())
    }

    fn delete_task(&self, id: u64) -> Result<()> {
        let mut state = self.write_state();
        let removed = state.tasks.remove(&id);

        if let Err(err) = self.persist(&state.tasks) {
            if let Some(task) = removed {
                state.tasks.insert(id, task);
            }
            warn!(id, error = %err, "delete rolled back after failed write");
            return Err(err);
        }
        Ok(())
    }
}

fn load_tasks(path: &Path) -> Result<BTreeMap<u64, Task>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => return Err(err.into()),
    };
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let tasks: BTreeMap<u64, Task> = serde_json::from_str(&content)?;
    for (key, task) in &tasks {
        if *key == 0 {
            return Err(Error::CorruptStore {
                path: path.to_path_buf(),
                reason: "task ID 0 is reserved for unsaved tasks".to_string(),
            });
        }
        if *key != task.id {
            return Err(Error::CorruptStore {
                path: path.to_path_buf(),
                reason: format!("entry \"{key}\" holds task with ID {}", task.id),
            });
        }
    }
    Ok(tasks)
}
