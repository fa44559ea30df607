//! Command-line interface for task
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is implemented in its own submodule and receives the
//! task repository explicitly from [`Cli::run`].

use std::path::PathBuf;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use crate::config::{self, Config, SortKey};
use crate::error::{Error, Result};
use crate::model::{Task, TaskStatus};
use crate::output::OutputOptions;
use crate::store::{JsonStore, TaskRepository};

mod add;
mod done;
mod edit;
mod list;
mod remove;
mod show;

/// task - personal task tracking
///
/// Add, list, edit, complete and remove tasks stored in a local JSON file.
#[derive(Parser, Debug)]
#[command(name = "task")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task file (defaults to ~/.task/tasks.json)
    #[arg(long, global = true, env = "TASK_FILE")]
    pub file: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.task/config.toml)
    #[arg(long, global = true, env = "TASK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    #[command(after_help = "Examples:\n  \
        task add \"Complete project report\"\n  \
        task add \"Force push to prod\" --project work --priority 2 --due 2025-06-03")]
    Add {
        /// Task title (multiple words are joined with spaces)
        title: Vec<String>,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Project the task belongs to, e.g. work or private
        #[arg(short, long)]
        project: Option<String>,

        /// Task priority (1=Low, 2=Medium, 3=High)
        #[arg(short = 'P', long)]
        priority: Option<u8>,

        /// Due date (format: YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks
    #[command(after_help = "Examples:\n  \
        task list                  # List all incomplete tasks\n  \
        task list --completed      # Include completed tasks\n  \
        task list --project work   # Only tasks in the 'work' project\n  \
        task list --sort priority  # Highest priority first")]
    List {
        /// Filter tasks by project (case-insensitive)
        #[arg(short, long)]
        project: Option<String>,

        /// Show completed tasks
        #[arg(short, long)]
        completed: bool,

        /// Sort tasks by: id, priority, or due
        #[arg(short, long, value_enum)]
        sort: Option<SortKey>,
    },

    /// Show all info about a task
    Show {
        /// Task ID or title
        task: String,
    },

    /// Edit a task
    Edit {
        /// Task ID or title
        task: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New project
        #[arg(short, long)]
        project: Option<String>,

        /// New priority (1=Low, 2=Medium, 3=High)
        #[arg(short = 'P', long)]
        priority: Option<u8>,

        /// New due date (format: YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Mark task(s) as completed
    #[command(after_help = "Examples:\n  \
        task do 1           # Mark task 1 as completed\n  \
        task do 1 2 3       # Mark several tasks as completed\n  \
        task do 1 --time 30 # Complete and log 30 minutes spent")]
    Do {
        /// Task IDs or titles
        #[arg(required = true)]
        tasks: Vec<String>,

        /// Time spent on the task in minutes
        #[arg(short, long, default_value_t = 0)]
        time: u64,
    },

    /// Remove task(s) permanently
    ///
    /// Unlike `do`, removed tasks are gone for good.
    Remove {
        /// Task IDs or titles
        #[arg(required = true)]
        tasks: Vec<String>,
    },
}

impl Cli {
    /// Load configuration, open the store once, and dispatch the command.
    pub fn run(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let store_path = config.store_path(self.file)?;
        let store = JsonStore::open(&store_path)?;
        debug!(path = %store.path().display(), "task store ready");

        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        execute(self.command, &store, &config, output)
    }
}

/// Run a parsed command against an already constructed repository.
pub fn execute(
    command: Commands,
    store: &dyn TaskRepository,
    config: &Config,
    output: OutputOptions,
) -> Result<()> {
    match command {
        Commands::Add {
            title,
            description,
            project,
            priority,
            due,
        } => add::run(
            store,
            config,
            add::AddOptions {
                title,
                description,
                project,
                priority,
                due,
            },
            output,
        ),
        Commands::List {
            project,
            completed,
            sort,
        } => list::run(
            store,
            config,
            list::ListOptions {
                project,
                completed,
                sort,
            },
            output,
        ),
        Commands::Show { task } => show::run(store, show::ShowOptions { task }, output),
        Commands::Edit {
            task,
            title,
            description,
            project,
            priority,
            due,
            clear_due,
        } => edit::run(
            store,
            edit::EditOptions {
                task,
                title,
                description,
                project,
                priority,
                due,
                clear_due,
            },
            output,
        ),
        Commands::Do { tasks, time } => done::run(store, done::DoOptions { tasks, time }, output),
        Commands::Remove { tasks } => remove::run(store, remove::RemoveOptions { tasks }, output),
    }
}

fn load_config(explicit: Option<&std::path::Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load_or_default(path);
    }
    match config::default_config_path() {
        Ok(path) => Config::load_or_default(&path),
        Err(Error::HomeDirNotFound) => Ok(Config::default()),
        Err(err) => Err(err),
    }
}

/// A task plus its presentation status, as emitted in JSON output.
#[derive(Debug, Serialize)]
pub(crate) struct TaskView<'a> {
    #[serde(flatten)]
    task: &'a Task,
    status: TaskStatus,
}

impl<'a> TaskView<'a> {
    pub(crate) fn new(task: &'a Task, now: DateTime<Utc>) -> Self {
        Self {
            task,
            status: task.status_at(now),
        }
    }
}

/// Resolve a task by numeric ID or by case-insensitive exact title.
pub(crate) fn resolve_task(store: &dyn TaskRepository, identifier: &str) -> Result<Task> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(Error::InvalidArgument(
            "task ID or title cannot be empty".to_string(),
        ));
    }

    if identifier.chars().all(|c| c.is_ascii_digit()) {
        let id: u64 = identifier
            .parse()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| Error::InvalidArgument(format!("invalid task ID: {identifier}")))?;
        return store.get_task_by_id(id).ok_or(Error::TaskNotFound(id));
    }

    let needle = identifier.to_lowercase();
    let mut matches: Vec<Task> = store
        .list_all_tasks()
        .into_iter()
        .filter(|task| task.title.to_lowercase() == needle)
        .collect();
    matches.sort_by_key(|task| task.id);

    match matches.len() {
        0 => Err(Error::TaskNameNotFound(identifier.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::AmbiguousTaskName {
            name: identifier.to_string(),
            ids: matches.iter().map(|task| task.id).collect(),
        }),
    }
}

/// Parse a `YYYY-MM-DD` due date as midnight UTC.
///
/// Only four-digit years from 0001 to 9999 are accepted, and `0001-01-01`
/// is reserved for "no due date" in the task file.
pub(crate) fn parse_due_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if !is_plain_date(raw) {
        return Err(Error::InvalidArgument(format!(
            "invalid date format: expected YYYY-MM-DD, got '{raw}'"
        )));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| Error::InvalidArgument(format!("invalid date format: {err}")))?;
    if date.year() < 1 || NaiveDate::from_ymd_opt(1, 1, 1) == Some(date) {
        return Err(Error::InvalidArgument(format!(
            "invalid date: {raw} is outside the supported range"
        )));
    }
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid date: {raw}")))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

fn is_plain_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}
