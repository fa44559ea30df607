//! task edit

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Priority;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskRepository;

use super::{parse_due_date, resolve_task, TaskView};

pub struct EditOptions {
    pub task: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub project: Option<String>,
    pub priority: Option<u8>,
    pub due: Option<String>,
    pub clear_due: bool,
}

impl EditOptions {
    fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.project.is_some()
            || self.priority.is_some()
            || self.due.is_some()
            || self.clear_due
    }
}

pub fn run(store: &dyn TaskRepository, options: EditOptions, output: OutputOptions) -> Result<()> {
    if !options.has_changes() {
        return Err(Error::InvalidArgument(
            "nothing to edit; pass at least one of --title, --description, --project, \
             --priority, --due or --clear-due"
                .to_string(),
        ));
    }

    let mut task = resolve_task(store, &options.task)?;
    let mut changed = Vec::new();

    if let Some(title) = options.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidArgument(
                "task title cannot be empty".to_string(),
            ));
        }
        task.title = title.to_string();
        changed.push("title");
    }
    if let Some(description) = options.description {
        task.description = description;
        changed.push("description");
    }
    if let Some(project) = options.project {
        task.project = project;
        changed.push("project");
    }
    if let Some(priority) = options.priority {
        task.priority = Priority::try_from(priority)?;
        changed.push("priority");
    }
    if let Some(due) = options.due.as_deref() {
        task.due_date = Some(parse_due_date(due)?);
        changed.push("due date");
    } else if options.clear_due {
        task.due_date = None;
        changed.push("due date");
    }

    store.update_task(&task)?;
    debug!(id = task.id, fields = ?changed, "task edited");

    let mut human = HumanOutput::new(format!(
        "Updated task with ID {} to: {}",
        task.id, task.title
    ));
    human.push_summary("Changed", changed.join(", "));

    emit_success(
        output,
        "edit",
        &TaskView::new(&task, chrono::Utc::now()),
        Some(&human),
    )
}
