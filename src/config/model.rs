// src/config/model.rs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::OverlapPolicy;

/// One schedulable unit, exactly as it appears in the task definition source.
///
/// ```json
/// {
///   "name": "ping",
///   "interval": "*/5 * * * * *",
///   "exec": "echo ok",
///   "onSuccess": "",
///   "onFail": "notify-send ping failed"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    /// Unique key within the active set.
    pub name: String,

    /// Cron expression (5, 6 or 7 fields).
    pub interval: String,

    /// Command line: executable followed by whitespace-separated arguments.
    pub exec: String,

    /// Command fired after a successful run. Empty means no hook.
    #[serde(default)]
    pub on_success: String,

    /// Command fired after a failed run. Empty means no hook.
    #[serde(default)]
    pub on_fail: String,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, interval: impl Into<String>, exec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interval: interval.into(),
            exec: exec.into(),
            on_success: String::new(),
            on_fail: String::new(),
        }
    }

    /// The `onSuccess` command line, if one is configured.
    pub fn success_hook(&self) -> Option<&str> {
        non_blank(&self.on_success)
    }

    /// The `onFail` command line, if one is configured.
    pub fn fail_hook(&self) -> Option<&str> {
        non_blank(&self.on_fail)
    }
}

fn non_blank(s: &str) -> Option<&str> {
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Task list as parsed, before structural validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTaskList {
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskDefinition>,
}

/// A structurally valid task list (unique, non-empty names; non-empty commands).
///
/// Only obtainable through `TryFrom<RawTaskList>`, which runs validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<TaskDefinition>,
}

impl TaskList {
    pub(crate) fn new_unchecked(tasks: Vec<TaskDefinition>) -> Self {
        Self { tasks }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.name.clone()).collect()
    }
}

impl IntoIterator for TaskList {
    type Item = TaskDefinition;
    type IntoIter = std::vec::IntoIter<TaskDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

/// Top-level settings file (`Taskcron.toml`).
///
/// ```toml
/// [config]
/// tasks_file = "todo/tasks.json"
/// audit_log = "logs/output.json"
/// operational_log = "logs/log.txt"
/// audit_log_max_entries = 100
/// overlap = "allow"
/// timeout = "10m"
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub config: ConfigSection,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    #[serde(default = "default_tasks_file")]
    pub tasks_file: PathBuf,

    #[serde(default = "default_audit_log")]
    pub audit_log: PathBuf,

    #[serde(default = "default_operational_log")]
    pub operational_log: PathBuf,

    #[serde(default = "default_audit_log_max_entries")]
    pub audit_log_max_entries: usize,

    /// `"allow"` (default) or `"skip"`.
    #[serde(default)]
    pub overlap: OverlapPolicy,

    /// Duration string (e.g. `"30s"`); unset means processes may run forever.
    #[serde(default)]
    pub timeout: Option<String>,
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from("todo/tasks.json")
}

fn default_audit_log() -> PathBuf {
    PathBuf::from("logs/output.json")
}

fn default_operational_log() -> PathBuf {
    PathBuf::from("logs/log.txt")
}

fn default_audit_log_max_entries() -> usize {
    100
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            tasks_file: default_tasks_file(),
            audit_log: default_audit_log(),
            operational_log: default_operational_log(),
            audit_log_max_entries: default_audit_log_max_entries(),
            overlap: OverlapPolicy::default(),
            timeout: None,
        }
    }
}
