//! task add

use chrono::{Duration, Utc};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Priority, Task};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskRepository;

use super::{parse_due_date, TaskView};

pub struct AddOptions {
    pub title: Vec<String>,
    pub description: Option<String>,
    pub project: Option<String>,
    pub priority: Option<u8>,
    pub due: Option<String>,
}

pub fn run(
    store: &dyn TaskRepository,
    config: &Config,
    options: AddOptions,
    output: OutputOptions,
) -> Result<()> {
    let title = options.title.join(" ");
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidArgument(
            "task name cannot be empty".to_string(),
        ));
    }

    let priority = match options.priority {
        Some(value) => Priority::try_from(value)?,
        None => config.default_priority(),
    };

    let now = Utc::now();
    let due = match options.due.as_deref() {
        Some(raw) => parse_due_date(raw)?,
        None => Duration::try_days(config.defaults.due_in_days)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(|| {
                Error::InvalidConfig("defaults.due_in_days is out of range".to_string())
            })?,
    };

    let project = options
        .project
        .unwrap_or_else(|| config.defaults.project.clone());
    let mut task = Task::new(
        title,
        options.description.unwrap_or_default(),
        project,
        priority,
        Some(due),
    );
    let id = store.add_task(&mut task)?;
    debug!(id, title = %task.title, "task added");

    let mut human = HumanOutput::new(format!(
        "Successfully added task: {} (ID: {})",
        task.title, id
    ));
    if task.is_overdue_at(now) {
        human.push_warning(format!("due date {} is already in the past", task.due_label()));
    }

    emit_success(output, "add", &TaskView::new(&task, now), Some(&human))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonStore;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn options(title: &[&str]) -> AddOptions {
        AddOptions {
            title: title.iter().map(|s| s.to_string()).collect(),
            description: None,
            project: None,
            priority: None,
            due: None,
        }
    }

    fn quiet() -> OutputOptions {
        OutputOptions {
            json: false,
            quiet: true,
        }
    }

    #[test]
    fn defaults_to_low_priority_due_tomorrow() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("tasks.json")).unwrap();
        let before = Utc::now();

        run(&store, &Config::default(), options(&["Buy", "milk"]), quiet()).unwrap();

        let task = store.get_task_by_id(1).expect("task 1");
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.project, "work");
        let due = task.due_date.expect("due date");
        assert!(due >= before + Duration::days(1));
        assert!(due <= Utc::now() + Duration::days(1));
    }

    #[test]
    fn explicit_flags_win() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("tasks.json")).unwrap();
        let mut opts = options(&["Ship release"]);
        opts.priority = Some(3);
        opts.due = Some("2025-06-03".to_string());
        opts.project = Some("launch".to_string());
        opts.description = Some("tag and publish".to_string());

        run(&store, &Config::default(), opts, quiet()).unwrap();

        let task = store.get_task_by_id(1).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(
            task.due_date,
            Some(Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap())
        );
        assert_eq!(task.project, "launch");
        assert_eq!(task.description, "tag and publish");
    }

    #[test]
    fn rejects_empty_title_and_bad_priority() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("tasks.json")).unwrap();

        let err = run(&store, &Config::default(), options(&["  "]), quiet()).unwrap_err();
        assert_eq!(err.to_string(), "task name cannot be empty");

        let mut opts = options(&["x"]);
        opts.priority = Some(4);
        let err = run(&store, &Config::default(), opts, quiet()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "priority must be between 1 (Low) and 3 (High)"
        );

        assert!(store.list_all_tasks().is_empty());
    }

    #[test]
    fn uses_configured_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("tasks.json")).unwrap();
        let mut config = Config::default();
        config.defaults.project = "private".to_string();
        config.defaults.priority = 2;
        config.defaults.due_in_days = 0;

        run(&store, &config, options(&["Call mom"]), quiet()).unwrap();

        let task = store.get_task_by_id(1).unwrap();
        assert_eq!(task.project, "private");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.due_date.unwrap() <= Utc::now());
    }
}
