// src/audit/model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one task run.
///
/// Serialized with the field names used in the audit file:
/// `task`, `success`, `timestamp`, `executionTime`, `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    pub task: String,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    /// Wall-clock duration in whole milliseconds (rounded).
    pub execution_time: u64,
    /// Invocation error, else stderr, else stdout.
    pub message: String,
}
