// src/audit/mod.rs

//! Bounded, newest-first audit trail of task executions.
//!
//! - [`model`] defines the persisted `ExecutionOutcome` record.
//! - [`store`] performs the read-prepend-truncate-write cycle on the audit file.
//! - [`writer`] owns the store in a single Tokio task. Every append goes
//!   through its queue, so concurrent completions never race on the file.

pub mod model;
pub mod store;
pub mod writer;

pub use model::ExecutionOutcome;
pub use store::AuditStore;
pub use writer::{AuditLogHandle, spawn_audit_writer};
