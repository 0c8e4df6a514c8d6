// src/reload/controller.rs

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use crate::config::load_and_validate_with;
use crate::errors::{Result, TaskcronError};
use crate::fs::FileSystem;
use crate::schedule::{ReconcileSummary, ScheduleRegistry};

/// Result of a reload that did not have to terminate the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadStatus {
    /// The new list replaced the active set.
    Ingested(ReconcileSummary),
    /// The source was invalid; the previous set keeps running untouched.
    KeptPrevious,
}

/// Reacts to "definition changed" by reloading the task list.
///
/// An invalid source is recoverable while tasks are running, and fatal when
/// the registry is empty: with nothing scheduled and a broken file there is
/// nothing useful left to do.
#[derive(Debug)]
pub struct ReloadController {
    fs: Arc<dyn FileSystem>,
    source: PathBuf,
    registry: Arc<ScheduleRegistry>,
}

impl ReloadController {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        source: impl Into<PathBuf>,
        registry: Arc<ScheduleRegistry>,
    ) -> Self {
        Self {
            fs,
            source: source.into(),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<ScheduleRegistry> {
        &self.registry
    }

    /// Read, parse and validate the source, then reconcile.
    ///
    /// Logs exactly one line. Returns [`TaskcronError::NoValidTasks`] when the
    /// source is invalid and no tasks are scheduled.
    pub fn reload(&self) -> Result<ReloadStatus> {
        match load_and_validate_with(self.fs.as_ref(), &self.source) {
            Ok(list) => {
                let summary = self.registry.reconcile(list);
                let rejected: Vec<String> = summary
                    .rejected
                    .iter()
                    .map(|r| format!("{} ({})", r.name, r.error))
                    .collect();
                info!(
                    path = ?self.source,
                    installed = summary.installed,
                    ?rejected,
                    "new task list ingested"
                );
                Ok(ReloadStatus::Ingested(summary))
            }
            Err(e) if self.registry.is_empty() => {
                error!(
                    path = ?self.source,
                    error = %e,
                    "invalid task list and no tasks running; terminating"
                );
                Err(TaskcronError::NoValidTasks(e.to_string()))
            }
            Err(e) => {
                error!(
                    path = ?self.source,
                    error = %e,
                    "invalid task list; reverting to last known good task list"
                );
                Ok(ReloadStatus::KeptPrevious)
            }
        }
    }
}
