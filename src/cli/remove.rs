//! task remove

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::output::{emit_progress, emit_success, OutputOptions};
use crate::store::TaskRepository;

use super::resolve_task;

pub struct RemoveOptions {
    pub tasks: Vec<String>,
}

#[derive(Serialize)]
struct RemovedTask {
    id: u64,
    title: String,
}

/// Delete each target in order, stopping at the first failure.
pub fn run(
    store: &dyn TaskRepository,
    options: RemoveOptions,
    output: OutputOptions,
) -> Result<()> {
    let mut removed = Vec::with_capacity(options.tasks.len());

    for identifier in &options.tasks {
        let task = resolve_task(store, identifier)?;
        store.delete_task(task.id)?;
        debug!(id = task.id, "task removed");

        emit_progress(output, &format!("Removed task {}: {}", task.id, task.title));
        removed.push(RemovedTask {
            id: task.id,
            title: task.title,
        });
    }

    emit_success(output, "remove", &removed, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Priority, Task};
    use crate::store::JsonStore;
    use tempfile::TempDir;

    #[test]
    fn removes_by_id_and_title() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("tasks.json")).unwrap();
        for title in ["a", "b", "c"] {
            store
                .add_task(&mut Task::new(title, "", "", Priority::Low, None))
                .unwrap();
        }

        run(
            &store,
            RemoveOptions {
                tasks: vec!["1".to_string(), "C".to_string()],
            },
            OutputOptions {
                json: false,
                quiet: true,
            },
        )
        .unwrap();

        let left: Vec<u64> = store.list_all_tasks().iter().map(|t| t.id).collect();
        assert_eq!(left, vec![2]);

        let err = run(
            &store,
            RemoveOptions {
                tasks: vec!["1".to_string()],
            },
            OutputOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(1)));
    }
}
