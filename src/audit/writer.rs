// src/audit/writer.rs

//! Single-writer actor for the audit log.
//!
//! All appends are funnelled through one Tokio task that owns the
//! [`AuditStore`]. Each read-modify-write therefore completes before the next
//! one starts and no outcome is lost to a racing writer.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::audit::model::ExecutionOutcome;
use crate::audit::store::AuditStore;
use crate::errors::{Result, TaskcronError};

#[derive(Debug)]
enum AuditCommand {
    Append(ExecutionOutcome),
    Flush(oneshot::Sender<()>),
}

/// Cloneable handle used by executions to submit outcomes.
#[derive(Debug, Clone)]
pub struct AuditLogHandle {
    tx: mpsc::Sender<AuditCommand>,
}

impl AuditLogHandle {
    /// Queue `outcome` for writing.
    ///
    /// Returns once the writer has accepted it, not once it is on disk.
    pub async fn append(&self, outcome: ExecutionOutcome) -> Result<()> {
        self.tx
            .send(AuditCommand::Append(outcome))
            .await
            .map_err(|_| writer_gone())
    }

    /// Wait until every outcome queued before this call has been written
    /// (or has failed and been logged).
    pub async fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(AuditCommand::Flush(ack_tx))
            .await
            .map_err(|_| writer_gone())?;
        ack_rx.await.map_err(|_| writer_gone())
    }
}

fn writer_gone() -> TaskcronError {
    TaskcronError::Other(anyhow::anyhow!("audit log writer has stopped"))
}

/// Spawn the writer task that owns `store`.
///
/// The task runs until every [`AuditLogHandle`] has been dropped.
pub fn spawn_audit_writer(store: AuditStore) -> AuditLogHandle {
    let (tx, mut rx) = mpsc::channel::<AuditCommand>(64);
    let store = Arc::new(store);

    tokio::spawn(async move {
        info!(path = ?store.path(), max_entries = store.max_entries(), "audit log writer started");

        while let Some(command) = rx.recv().await {
            match command {
                AuditCommand::Append(outcome) => write_outcome(&store, outcome).await,
                AuditCommand::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }

        info!("audit log writer finished (channel closed)");
    });

    AuditLogHandle { tx }
}

async fn write_outcome(store: &Arc<AuditStore>, outcome: ExecutionOutcome) {
    let task = outcome.task.clone();
    let store = Arc::clone(store);

    let res = tokio::task::spawn_blocking(move || store.append(outcome)).await;
    match res {
        Ok(Ok(())) => debug!(task = %task, "execution outcome recorded"),
        Ok(Err(e)) => error!(task = %task, error = %e, "failed to write audit log entry"),
        Err(e) => error!(task = %task, error = %e, "audit log write panicked"),
    }
}
