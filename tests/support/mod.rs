#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use task::store::JsonStore;
use tempfile::TempDir;

/// An isolated store + config pair for one test.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join(".task").join("tasks.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(".task").join("config.toml")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_store(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.store_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_store(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.store_path())?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn open_store(&self) -> task::Result<JsonStore> {
        JsonStore::open(self.store_path())
    }

    /// The `task` binary pointed at this environment's files.
    pub fn cmd(&self) -> Command {
        let mut cmd = task_cmd();
        cmd.arg("--file")
            .arg(self.store_path())
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

pub fn task_cmd() -> Command {
    let mut cmd = Command::cargo_bin("task").expect("task binary");
    cmd.env_remove("TASK_FILE")
        .env_remove("TASK_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}
