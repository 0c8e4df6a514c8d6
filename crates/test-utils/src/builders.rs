#![allow(dead_code)]

use taskcron::config::{RawTaskList, TaskDefinition, TaskList};

/// Builder for `TaskList` to simplify test setup.
pub struct TaskListBuilder {
    raw: RawTaskList,
}

impl TaskListBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawTaskList::default(),
        }
    }

    pub fn with_task(mut self, task: TaskDefinition) -> Self {
        self.raw.tasks.push(task);
        self
    }

    /// Shorthand for a task without hooks.
    pub fn with(self, name: &str, interval: &str, exec: &str) -> Self {
        self.with_task(TaskDefinitionBuilder::new(name, interval, exec).build())
    }

    pub fn build_raw(self) -> RawTaskList {
        self.raw
    }

    pub fn build(self) -> TaskList {
        TaskList::try_from(self.raw).expect("Failed to build valid task list from builder")
    }

    /// Serialize as the JSON document the reload controller reads.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.raw.tasks).expect("task definitions serialize")
    }
}

impl Default for TaskListBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskDefinition`.
pub struct TaskDefinitionBuilder {
    task: TaskDefinition,
}

impl TaskDefinitionBuilder {
    pub fn new(name: &str, interval: &str, exec: &str) -> Self {
        Self {
            task: TaskDefinition::new(name, interval, exec),
        }
    }

    pub fn on_success(mut self, cmd: &str) -> Self {
        self.task.on_success = cmd.to_string();
        self
    }

    pub fn on_fail(mut self, cmd: &str) -> Self {
        self.task.on_fail = cmd.to_string();
        self
    }

    pub fn build(self) -> TaskDefinition {
        self.task
    }
}
