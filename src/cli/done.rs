//! task do

use chrono::Utc;
use tracing::debug;

use crate::error::Result;
use crate::output::{emit_progress, emit_success, OutputOptions};
use crate::store::TaskRepository;

use super::{resolve_task, TaskView};

pub struct DoOptions {
    pub tasks: Vec<String>,
    /// Minutes to log on each task before completing it
    pub time: u64,
}

/// Complete each target in order, stopping at the first failure.
pub fn run(store: &dyn TaskRepository, options: DoOptions, output: OutputOptions) -> Result<()> {
    let mut completed = Vec::with_capacity(options.tasks.len());

    for identifier in &options.tasks {
        let mut task = resolve_task(store, identifier)?;
        if options.time > 0 {
            task.add_time_spent(options.time);
        }
        task.complete();
        store.update_task(&task)?;
        debug!(id = task.id, time_spent = task.time_spent, "task completed");

        emit_progress(output, &format!("Completed task {}: {}", task.id, task.title));
        completed.push(task);
    }

    let now = Utc::now();
    let views: Vec<TaskView> = completed
        .iter()
        .map(|task| TaskView::new(task, now))
        .collect();
    emit_success(output, "do", &views, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Priority, Task};
    use crate::store::JsonStore;
    use tempfile::TempDir;

    fn quiet() -> OutputOptions {
        OutputOptions {
            json: false,
            quiet: true,
        }
    }

    fn seeded(titles: &[&str]) -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("tasks.json")).unwrap();
        for title in titles {
            store
                .add_task(&mut Task::new(*title, "", "work", Priority::Low, None))
                .unwrap();
        }
        (dir, store)
    }

    #[test]
    fn completes_and_logs_time() {
        let (_dir, store) = seeded(&["a", "b"]);
        run(
            &store,
            DoOptions {
                tasks: vec!["1".to_string(), "b".to_string()],
                time: 30,
            },
            quiet(),
        )
        .unwrap();

        for id in [1, 2] {
            let task = store.get_task_by_id(id).unwrap();
            assert!(task.is_completed());
            assert_eq!(task.time_spent, 30);
        }
    }

    #[test]
    fn repeat_completion_accumulates_time() {
        let (_dir, store) = seeded(&["a"]);
        for _ in 0..2 {
            run(
                &store,
                DoOptions {
                    tasks: vec!["1".to_string()],
                    time: 10,
                },
                quiet(),
            )
            .unwrap();
        }
        assert_eq!(store.get_task_by_id(1).unwrap().time_spent, 20);
    }

    #[test]
    fn stops_at_first_missing_task() {
        let (_dir, store) = seeded(&["a", "b"]);
        let err = run(
            &store,
            DoOptions {
                tasks: vec!["1".to_string(), "7".to_string(), "2".to_string()],
                time: 0,
            },
            quiet(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::TaskNotFound(7)));
        assert!(store.get_task_by_id(1).unwrap().is_completed());
        assert!(!store.get_task_by_id(2).unwrap().is_completed());
    }
}
