//! task - personal task tracking library
//!
//! This library provides the core functionality for the `task` CLI: a task
//! entity, a file-backed repository that owns every task, and the command
//! layer that drives it.
//!
//! # Core Concepts
//!
//! - **Task**: a to-do item with title, description, project, priority,
//!   due date, completion time and minutes spent
//! - **Repository**: the single source of truth for tasks, persisted to one
//!   JSON file after every change
//! - **Stable IDs**: assigned by the repository, never reused
//!
//! # Module Organization
//!
//! - `model`: Task entity, priority and presentation status
//! - `store`: `TaskRepository` trait and the JSON-file implementation
//! - `atomic`: Atomic file writes (temp file + rename)
//! - `config`: Configuration loading from `~/.task/config.toml`
//! - `error`: Error types, exit codes and result alias
//! - `output`: Human and JSON output for commands
//! - `cli`: Command-line interface using clap

pub mod atomic;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod store;

pub use error::{Error, Result};
pub use model::{Priority, Task};
pub use store::{JsonStore, TaskRepository};
