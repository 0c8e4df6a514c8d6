// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] splits command lines into program + arguments.
//! - [`process`] is the capability that actually spawns and waits on an OS
//!   process (`ProcessInvoker`), with the real `tokio::process` backend.
//!   Tests swap in a fake implementation.
//! - [`invoker`] runs one firing of a task: timing, outcome classification,
//!   audit submission and hook dispatch.
//! - [`handler`] fires `onSuccess` / `onFail` hooks and ignores their result.

pub mod command;
pub mod handler;
pub mod invoker;
pub mod process;

pub use command::CommandLine;
pub use handler::HandlerDispatcher;
pub use invoker::{ExecOptions, ExecutionInvoker, classify};
pub use process::{InvokeError, InvokeFuture, ProcessInvoker, ProcessOutput, TokioProcessInvoker};
