// src/schedule/registry.rs

//! The live set of scheduled tasks.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::config::{TaskDefinition, TaskList};
use crate::exec::ExecutionInvoker;
use crate::schedule::backend::{FireFn, ScheduleBackend, ScheduleHandle};
use crate::schedule::cron::CronExpr;

/// A task definition bound to a live schedule handle.
///
/// Owned exclusively by the registry; dropping it cancels the handle.
#[derive(Debug)]
pub struct ScheduledTask {
    pub definition: Arc<TaskDefinition>,
    pub cron: CronExpr,
    handle: ScheduleHandle,
}

/// A task left out of the active set because its `interval` did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTask {
    pub name: String,
    pub error: String,
}

/// What a reconcile installed and what it turned away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub installed: usize,
    pub rejected: Vec<RejectedTask>,
}

/// Owns the task-name → schedule mapping.
///
/// The mapping is only reachable through this type and is guarded by a
/// single mutex; firings never read it (each callback captures its own
/// definition), so a reconcile cannot race a firing lookup.
#[derive(Debug)]
pub struct ScheduleRegistry {
    backend: Arc<dyn ScheduleBackend>,
    invoker: Arc<ExecutionInvoker>,
    active: Mutex<BTreeMap<String, ScheduledTask>>,
}

impl ScheduleRegistry {
    pub fn new(backend: Arc<dyn ScheduleBackend>, invoker: Arc<ExecutionInvoker>) -> Self {
        Self {
            backend,
            invoker,
            active: Mutex::new(BTreeMap::new()),
        }
    }

    /// Replace the whole active set with `definitions`.
    ///
    /// Every existing handle is cancelled before any new one is installed.
    /// A task whose `interval` does not parse is skipped and reported in the
    /// summary; the rest are still installed. Logging is left to the caller.
    pub fn reconcile(&self, definitions: TaskList) -> ReconcileSummary {
        let mut active = self.lock_active();

        let previous = std::mem::take(&mut *active);
        for (name, mut scheduled) in previous {
            if !scheduled.handle.cancel() {
                debug!(task = %name, "schedule handle was already stopped");
            }
        }

        let mut summary = ReconcileSummary::default();
        for definition in definitions {
            let cron = match CronExpr::parse(&definition.interval) {
                Ok(cron) => cron,
                Err(e) => {
                    summary.rejected.push(RejectedTask {
                        name: definition.name,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let name = definition.name.clone();
            let definition = Arc::new(definition);
            let handle = self
                .backend
                .schedule(&name, &cron, self.fire_fn(&definition));

            debug!(task = %name, interval = %cron, "task scheduled");
            active.insert(
                name,
                ScheduledTask {
                    definition,
                    cron,
                    handle,
                },
            );
            summary.installed += 1;
        }

        summary
    }

    /// Names of the currently scheduled tasks, sorted.
    pub fn current_names(&self) -> Vec<String> {
        self.lock_active().keys().cloned().collect()
    }

    /// Definition currently scheduled under `name`.
    pub fn definition(&self, name: &str) -> Option<Arc<TaskDefinition>> {
        self.lock_active()
            .get(name)
            .map(|scheduled| Arc::clone(&scheduled.definition))
    }

    pub fn len(&self) -> usize {
        self.lock_active().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_active().is_empty()
    }

    /// Cancel every schedule and empty the set. Returns how many were active.
    pub fn shutdown(&self) -> usize {
        let mut active = self.lock_active();
        let count = active.len();
        for scheduled in active.values_mut() {
            scheduled.handle.cancel();
        }
        active.clear();
        count
    }

    fn fire_fn(&self, definition: &Arc<TaskDefinition>) -> FireFn {
        let invoker = Arc::clone(&self.invoker);
        let definition = Arc::clone(definition);
        Arc::new(move || {
            invoker.spawn(Arc::clone(&definition));
        })
    }

    fn lock_active(&self) -> MutexGuard<'_, BTreeMap<String, ScheduledTask>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
