// src/exec/handler.rs

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::exec::command::CommandLine;
use crate::exec::process::ProcessInvoker;

/// Fires `onSuccess` / `onFail` hook commands.
///
/// Hooks are fire-and-forget: the process result is dropped, nothing is timed
/// or recorded, and a hook never triggers further hooks.
#[derive(Debug, Clone)]
pub struct HandlerDispatcher {
    process: Arc<dyn ProcessInvoker>,
}

impl HandlerDispatcher {
    pub fn new(process: Arc<dyn ProcessInvoker>) -> Self {
        Self { process }
    }

    /// Start `command_line` in the background.
    ///
    /// Returns `None` for a blank command line. The join handle is only useful
    /// to tests; production callers drop it.
    pub fn fire(&self, command_line: &str) -> Option<JoinHandle<()>> {
        let command = CommandLine::parse(command_line)?;
        let process = Arc::clone(&self.process);

        Some(tokio::spawn(async move {
            let _ = process.invoke(&command).await;
        }))
    }
}
