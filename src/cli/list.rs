//! task list

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::config::{Config, SortKey};
use crate::error::Result;
use crate::model::Task;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskRepository;

use super::TaskView;

const HEADERS: [&str; 6] = ["ID", "Status", "Priority", "Due Date", "Project", "Title"];

pub struct ListOptions {
    pub project: Option<String>,
    pub completed: bool,
    pub sort: Option<SortKey>,
}

pub fn run(
    store: &dyn TaskRepository,
    config: &Config,
    options: ListOptions,
    output: OutputOptions,
) -> Result<()> {
    let now = Utc::now();
    let all = store.list_all_tasks();
    if all.is_empty() {
        let mut human = HumanOutput::new("No tasks found.");
        human.push_next_step("task add <TITLE>");
        return emit_success(output, "list", &Vec::<TaskView>::new(), Some(&human));
    }

    let show_completed = options.completed || config.list.show_completed;
    let mut tasks = filter_tasks(all, options.project.as_deref(), show_completed);
    sort_tasks(&mut tasks, options.sort.unwrap_or(config.list.sort));

    let human = if tasks.is_empty() {
        HumanOutput::new("No tasks match the filter criteria.")
    } else {
        HumanOutput::new(render_table(&tasks, now))
    };
    let views: Vec<TaskView> = tasks.iter().map(|task| TaskView::new(task, now)).collect();
    emit_success(output, "list", &views, Some(&human))
}

fn filter_tasks(tasks: Vec<Task>, project: Option<&str>, show_completed: bool) -> Vec<Task> {
    let project = project.map(str::to_lowercase);
    tasks
        .into_iter()
        .filter(|task| show_completed || !task.is_completed())
        .filter(|task| match &project {
            Some(project) => task.project.to_lowercase() == *project,
            None => true,
        })
        .collect()
}

fn sort_tasks(tasks: &mut [Task], key: SortKey) {
    match key {
        SortKey::Id => tasks.sort_by_key(|task| task.id),
        SortKey::Priority => tasks.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::Due => tasks.sort_by(|a, b| {
            compare_due(a.due_date, b.due_date).then_with(|| a.id.cmp(&b.id))
        }),
    }
}

// Tasks without a due date sort last
fn compare_due(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn render_table(tasks: &[Task], now: DateTime<Utc>) -> String {
    let rows: Vec<[String; 6]> = tasks
        .iter()
        .map(|task| {
            [
                task.id.to_string(),
                task.status_at(now).to_string(),
                task.priority.to_string(),
                task.due_label(),
                task.project.clone(),
                task.title.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(&HEADERS.map(String::from), &widths, false));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-|-"),
    );
    for row in &rows {
        lines.push(format_row(row, &widths, true));
    }
    lines.join("\n")
}

fn format_row(cells: &[String; 6], widths: &[usize; 6], right_align_id: bool) -> String {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
        if idx > 0 {
            line.push_str(" | ");
        }
        let padded = if idx == 0 && right_align_id {
            format!("{cell:>width$}")
        } else {
            format!("{cell:<width$}")
        };
        line.push_str(&padded);
    }
    line.trim_end().to_string()
}
