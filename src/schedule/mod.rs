// src/schedule/mod.rs

//! Cron scheduling and the live set of scheduled tasks.
//!
//! - [`cron`] wraps cron-expression parsing and next-firing computation.
//! - [`backend`] is the `schedule(expr, callback) -> handle` capability and
//!   its Tokio timer implementation.
//! - [`registry`] owns the active task-name → schedule-handle mapping and
//!   replaces it wholesale on reconcile.

pub mod backend;
pub mod cron;
pub mod registry;

pub use backend::{FireFn, ScheduleBackend, ScheduleHandle, TokioScheduleBackend};
pub use cron::CronExpr;
pub use registry::{ReconcileSummary, RejectedTask, ScheduleRegistry, ScheduledTask};
