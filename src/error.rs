//! Error types for task
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown task, bad config)
//! - 4: Operation failed (I/O, corrupt store file)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the task CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for task operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("{0}")]
    InvalidArgument(String),

    #[error("task with ID {0} not found")]
    TaskNotFound(u64),

    #[error("no task found with name '{0}'")]
    TaskNameNotFound(String),

    #[error("multiple tasks found with name '{name}' (IDs: {})", format_ids(.ids))]
    AmbiguousTaskName { name: String, ids: Vec<u64> },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not determine home directory; pass --file explicitly")]
    HomeDirNotFound,

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("corrupt task file {}: {reason}", .path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

fn format_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_)
            | Error::TaskNotFound(_)
            | Error::TaskNameNotFound(_)
            | Error::AmbiguousTaskName { .. }
            | Error::InvalidConfig(_)
            | Error::HomeDirNotFound => exit_codes::USER_ERROR,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::CorruptStore { .. }
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output, where the variant carries any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound(id) => Some(serde_json::json!({ "id": id })),
            Error::TaskNameNotFound(name) => Some(serde_json::json!({ "name": name })),
            Error::AmbiguousTaskName { name, ids } => {
                Some(serde_json::json!({ "name": name, "ids": ids }))
            }
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            Error::CorruptStore { path, reason } => Some(serde_json::json!({
                "path": path.to_string_lossy(),
                "reason": reason,
            })),
            _ => None,
        }
    }
}

/// Result type alias for task operations
pub type Result<T> = std::result::Result<T, Error>;
