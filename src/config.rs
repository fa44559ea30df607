//! Configuration loading and management
//!
//! Handles parsing of `~/.task/config.toml`. Every key is optional:
//!
//! ```toml
//! [store]
//! path = "/somewhere/tasks.json"
//!
//! [defaults]
//! project = "work"
//! priority = 1
//! due_in_days = 1
//!
//! [list]
//! sort = "id"
//! show_completed = false
//! ```

use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Priority;

/// Name of the per-user directory under the home directory
pub const TASK_DIR: &str = ".task";

/// File name of the task store inside [`TASK_DIR`]
pub const STORE_FILE: &str = "tasks.json";

/// File name of the configuration inside [`TASK_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store location
    #[serde(default)]
    pub store: StoreConfig,

    /// Defaults applied by `task add`
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Defaults applied by `task list`
    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backing file; defaults to `~/.task/tasks.json`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_project")]
    pub project: String,

    /// 1 = Low, 2 = Medium, 3 = High
    #[serde(default = "default_priority")]
    pub priority: u8,

    /// Due date offset for new tasks, in days from now
    #[serde(default = "default_due_in_days")]
    pub due_in_days: i64,
}

fn default_project() -> String {
    "work".to_string()
}

fn default_priority() -> u8 {
    1
}

fn default_due_in_days() -> i64 {
    1
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            priority: default_priority(),
            due_in_days: default_due_in_days(),
        }
    }
}

/// Sort orders for `task list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Ascending ID
    #[default]
    Id,
    /// Highest priority first
    Priority,
    /// Earliest due date first
    Due,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default)]
    pub sort: SortKey,

    #[serde(default)]
    pub show_completed: bool,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or return defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Resolve the store file: explicit override, then `store.path`, then
    /// `~/.task/tasks.json`.
    pub fn store_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = explicit.or_else(|| self.store.path.clone()) {
            return Ok(path);
        }
        Ok(task_dir()?.join(STORE_FILE))
    }

    pub fn default_priority(&self) -> Priority {
        Priority::try_from(self.defaults.priority).unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        if Priority::try_from(self.defaults.priority).is_err() {
            return Err(Error::InvalidConfig(format!(
                "defaults.priority must be 1, 2 or 3 (got {})",
                self.defaults.priority
            )));
        }
        if self.defaults.due_in_days < 0 {
            return Err(Error::InvalidConfig(
                "defaults.due_in_days cannot be negative".to_string(),
            ));
        }
        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                return Err(Error::InvalidConfig(
                    "store.path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// The per-user `~/.task` directory
pub fn task_dir() -> Result<PathBuf> {
    let dirs = BaseDirs::new().ok_or(Error::HomeDirNotFound)?;
    Ok(dirs.home_dir().join(TASK_DIR))
}

/// Default configuration file, `~/.task/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(task_dir()?.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_match_cli_behaviour() {
        let cfg = Config::default();
        assert_eq!(cfg.defaults.project, "work");
        assert_eq!(cfg.default_priority(), Priority::Low);
        assert_eq!(cfg.defaults.due_in_days, 1);
        assert_eq!(cfg.list.sort, SortKey::Id);
        assert!(!cfg.list.show_completed);
        assert!(cfg.store.path.is_none());
    }

    #[test]
    fn load_or_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_or_default(&dir.path().join("config.toml")).expect("load");
        assert_eq!(cfg.defaults.project, "work");
    }

    #[test]
    fn load_reads_partial_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[defaults]\npriority = 3\n\n[list]\nsort = \"due\"\nshow_completed = true\n",
        )
        .expect("write config");

        let cfg = Config::load(&path).expect("load");
        assert_eq!(cfg.default_priority(), Priority::High);
        assert_eq!(cfg.defaults.project, "work");
        assert_eq!(cfg.list.sort, SortKey::Due);
        assert!(cfg.list.show_completed);
    }

    #[test]
    fn rejects_out_of_range_priority() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults]\npriority = 5\n").expect("write config");

        let err = Config::load_or_default(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_negative_due_offset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults]\ndue_in_days = -2\n").expect("write config");

        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults\n").expect("write config");

        assert!(matches!(
            Config::load_or_default(&path),
            Err(Error::TomlParse(_))
        ));
    }

    #[test]
    fn store_path_precedence() {
        let mut cfg = Config::default();
        cfg.store.path = Some(PathBuf::from("/from/config.json"));

        let explicit = cfg
            .store_path(Some(PathBuf::from("/from/flag.json")))
            .unwrap();
        assert_eq!(explicit, PathBuf::from("/from/flag.json"));

        let configured = cfg.store_path(None).unwrap();
        assert_eq!(configured, PathBuf::from("/from/config.json"));
    }
}
