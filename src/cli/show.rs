//! task show

use chrono::{SecondsFormat, Utc};

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskRepository;

use super::{resolve_task, TaskView};

pub struct ShowOptions {
    pub task: String,
}

pub fn run(store: &dyn TaskRepository, options: ShowOptions, output: OutputOptions) -> Result<()> {
    let task = resolve_task(store, &options.task)?;
    let now = Utc::now();

    let mut human = HumanOutput::new(task.to_string());
    human.push_summary("ID", task.id.to_string());
    human.push_summary("Priority", task.priority.as_str());
    human.push_summary("Project", display_or_dash(&task.project));
    human.push_summary("Due", task.due_label());
    human.push_summary(
        "Created",
        task.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    human.push_summary(
        "Completed",
        task.completed_at
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "-".to_string()),
    );
    human.push_summary("Time spent", format!("{} min", task.time_spent));
    if !task.description.is_empty() {
        human.push_detail(task.description.clone());
    }

    emit_success(output, "show", &TaskView::new(&task, now), Some(&human))
}

fn display_or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
