// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{RawTaskList, TaskList};
use crate::errors::{Result, TaskcronError};

impl TryFrom<RawTaskList> for TaskList {
    type Error = crate::errors::TaskcronError;

    fn try_from(raw: RawTaskList) -> std::result::Result<Self, Self::Error> {
        validate_task_list(&raw)?;
        Ok(TaskList::new_unchecked(raw.tasks))
    }
}

/// Structural checks only. Cron expressions are checked per task when the
/// list is installed, so one bad `interval` never rejects the whole file.
pub fn validate_task_list(list: &RawTaskList) -> Result<()> {
    validate_fields(list)?;
    validate_unique_names(list)?;
    Ok(())
}

fn validate_fields(list: &RawTaskList) -> Result<()> {
    for (idx, task) in list.tasks.iter().enumerate() {
        if task.name.trim().is_empty() {
            return Err(TaskcronError::ConfigError(format!(
                "task #{} has an empty `name`",
                idx
            )));
        }
        if task.exec.split_whitespace().next().is_none() {
            return Err(TaskcronError::ConfigError(format!(
                "task '{}' has an empty `exec` command",
                task.name
            )));
        }
    }
    Ok(())
}

fn validate_unique_names(list: &RawTaskList) -> Result<()> {
    let mut seen = HashSet::new();
    for task in list.tasks.iter() {
        if !seen.insert(task.name.as_str()) {
            return Err(TaskcronError::DuplicateTask(task.name.clone()));
        }
    }
    Ok(())
}
