// src/engine/mod.rs

//! Orchestration engine for taskcron.
//!
//! The runtime loop reacts to:
//! - definition-changed signals from the watcher (reload + reconcile)
//! - shutdown signals (cancel schedules, flush the audit log)
//!
//! Cron firings do not pass through this loop; each schedule handle spawns
//! its executions directly.

/// Events flowing into the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// The task definition source changed on disk.
    DefinitionsChanged,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod runtime;

pub use runtime::Runtime;
