// src/exec/invoker.rs

//! Execution of a single task firing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::audit::{AuditLogHandle, ExecutionOutcome};
use crate::config::TaskDefinition;
use crate::exec::command::CommandLine;
use crate::exec::handler::HandlerDispatcher;
use crate::exec::process::{InvokeError, ProcessInvoker, ProcessOutput};
use crate::types::OverlapPolicy;

/// Knobs for how firings are executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub overlap: OverlapPolicy,
    /// Kill the process and record a failure after this long.
    pub timeout: Option<Duration>,
}

/// Runs task firings: spawns the command, times it, classifies the result,
/// submits the outcome to the audit writer and fires the matching hook.
///
/// Holds no lock while a process runs. The only shared state is the per-name
/// count of in-flight runs, used by [`OverlapPolicy::Skip`].
#[derive(Debug)]
pub struct ExecutionInvoker {
    process: Arc<dyn ProcessInvoker>,
    audit: AuditLogHandle,
    handlers: HandlerDispatcher,
    options: ExecOptions,
    running: Mutex<HashMap<String, usize>>,
}

impl ExecutionInvoker {
    pub fn new(process: Arc<dyn ProcessInvoker>, audit: AuditLogHandle, options: ExecOptions) -> Self {
        let handlers = HandlerDispatcher::new(Arc::clone(&process));
        Self {
            process,
            audit,
            handlers,
            options,
            running: Mutex::new(HashMap::new()),
        }
    }

    /// Number of runs of `task` currently in flight.
    pub fn running_count(&self, task: &str) -> usize {
        self.lock_running().get(task).copied().unwrap_or(0)
    }

    /// Run `task` on its own Tokio task so the caller never waits on the
    /// process.
    pub fn spawn(self: &Arc<Self>, task: Arc<TaskDefinition>) -> JoinHandle<Option<ExecutionOutcome>> {
        let invoker = Arc::clone(self);
        tokio::spawn(async move { invoker.run(&task).await })
    }

    /// Run one firing of `task` to completion.
    ///
    /// Returns `None` if the firing was skipped because of the overlap
    /// policy; in that case nothing is recorded and no hook fires.
    pub async fn run(&self, task: &TaskDefinition) -> Option<ExecutionOutcome> {
        let Some(_slot) = self.begin_run(&task.name) else {
            debug!(task = %task.name, "previous run still in progress; skipping firing");
            return None;
        };

        debug!(task = %task.name, cmd = %task.exec, "starting task process");

        let start = Instant::now();
        let result = self.invoke(&task.exec).await;
        let execution_time = round_millis(start.elapsed());

        let (success, message) = classify(result);
        let outcome = ExecutionOutcome {
            task: task.name.clone(),
            success,
            timestamp: Utc::now(),
            execution_time,
            message,
        };

        if success {
            info!(task = %task.name, execution_time, "task succeeded");
        } else {
            warn!(task = %task.name, execution_time, message = %outcome.message, "task failed");
        }

        if let Err(e) = self.audit.append(outcome.clone()).await {
            warn!(task = %task.name, error = %e, "could not submit outcome to audit log");
        }

        let hook = if success {
            task.success_hook()
        } else {
            task.fail_hook()
        };
        if let Some(hook) = hook {
            debug!(task = %task.name, hook = %hook, success, "firing handler");
            self.handlers.fire(hook);
        }

        Some(outcome)
    }

    async fn invoke(&self, command_line: &str) -> Result<ProcessOutput, InvokeError> {
        let command = CommandLine::parse(command_line).ok_or(InvokeError::EmptyCommand)?;

        let output = match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.process.invoke(&command))
                .await
                .map_err(|_| InvokeError::TimedOut(limit))??,
            None => self.process.invoke(&command).await?,
        };

        output.into_result()
    }

    fn begin_run(&self, task: &str) -> Option<RunSlot<'_>> {
        let mut running = self.lock_running();
        let count = running.entry(task.to_string()).or_insert(0);
        if *count > 0 && self.options.overlap == OverlapPolicy::Skip {
            return None;
        }
        *count += 1;
        Some(RunSlot {
            running: &self.running,
            task: task.to_string(),
        })
    }

    fn lock_running(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.running.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Marks one in-flight run; releases it on drop.
struct RunSlot<'a> {
    running: &'a Mutex<HashMap<String, usize>>,
    task: String,
}

impl Drop for RunSlot<'_> {
    fn drop(&mut self) {
        let mut running = self.running.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(count) = running.get_mut(&self.task) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                running.remove(&self.task);
            }
        }
    }
}

/// Classify an invocation as `(success, message)`.
///
/// A run succeeds iff the invocation produced no error and nothing on
/// stderr. The message is the error, else stderr, else stdout.
pub fn classify(result: Result<ProcessOutput, InvokeError>) -> (bool, String) {
    match result {
        Err(e) => (false, e.to_string()),
        Ok(out) if !out.stderr.is_empty() => (false, out.stderr),
        Ok(out) => (true, out.stdout),
    }
}

fn round_millis(elapsed: Duration) -> u64 {
    ((elapsed.as_micros() + 500) / 1000) as u64
}
