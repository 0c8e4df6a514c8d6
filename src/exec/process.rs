// src/exec/process.rs

//! The OS process capability.
//!
//! Everything above this module sees a process as
//! `invoke(command) -> (exit status, stdout, stderr)` or an error, which keeps
//! the invoker and hook dispatcher testable without spawning anything.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use crate::exec::command::CommandLine;

/// Raw result of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Turn an abnormal exit into an [`InvokeError`], keeping normal exits
    /// (even ones that wrote to stderr) as output.
    pub fn into_result(self) -> Result<ProcessOutput, InvokeError> {
        match self.exit_code {
            Some(0) => Ok(self),
            Some(code) => Err(InvokeError::NonZeroExit {
                code,
                stderr: self.stderr,
            }),
            None => Err(InvokeError::Signalled {
                stderr: self.stderr,
            }),
        }
    }
}

/// Ways an invocation can fail before producing a normal exit.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("empty command line")]
    EmptyCommand,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command exited with status {code}{}", stderr_suffix(.stderr))]
    NonZeroExit { code: i32, stderr: String },

    #[error("command terminated by signal{}", stderr_suffix(.stderr))]
    Signalled { stderr: String },

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

pub type InvokeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ProcessOutput, InvokeError>> + Send + 'a>>;

/// Capability for running an external command and collecting its output.
pub trait ProcessInvoker: Send + Sync + Debug {
    fn invoke<'a>(&'a self, command: &'a CommandLine) -> InvokeFuture<'a>;
}

/// Production invoker built on `tokio::process`.
///
/// The child is killed if the returned future is dropped before it exits,
/// which is how timeouts terminate runaway processes.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessInvoker;

impl ProcessInvoker for TokioProcessInvoker {
    fn invoke<'a>(&'a self, command: &'a CommandLine) -> InvokeFuture<'a> {
        Box::pin(async move {
            let output = Command::new(&command.program)
                .args(&command.args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|source| InvokeError::Spawn {
                    program: command.program.clone(),
                    source,
                })?;

            Ok(ProcessOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_zero_exit_becomes_an_error() {
        let out = ProcessOutput {
            exit_code: Some(2),
            stdout: String::new(),
            stderr: "boom".to_string(),
        };
        let err = out.into_result().unwrap_err();
        assert_eq!(err.to_string(), "command exited with status 2: boom");
    }

    #[test]
    fn zero_exit_with_stderr_stays_output() {
        let out = ProcessOutput {
            exit_code: Some(0),
            stdout: "x".to_string(),
            stderr: "warn".to_string(),
        };
        assert_eq!(out.clone().into_result().unwrap(), out);
    }

    #[test]
    fn signal_has_no_code() {
        let out = ProcessOutput {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(
            out.into_result().unwrap_err().to_string(),
            "command terminated by signal"
        );
    }
}
