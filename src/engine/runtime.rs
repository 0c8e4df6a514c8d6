// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::audit::AuditLogHandle;
use crate::errors::Result;
use crate::reload::{ReloadController, ReloadStatus};

use super::RuntimeEvent;

/// Drives reloads in response to `RuntimeEvent`s.
pub struct Runtime {
    controller: ReloadController,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    audit: AuditLogHandle,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        controller: ReloadController,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        audit: AuditLogHandle,
    ) -> Self {
        Self {
            controller,
            event_rx,
            audit,
        }
    }

    /// Main event loop.
    ///
    /// Returns `Ok(())` on shutdown or when the event channel closes, and the
    /// reload error if a reload turns out to be fatal.
    pub async fn run(mut self) -> Result<()> {
        info!(
            tasks = self.controller.registry().len(),
            "taskcron runtime started"
        );

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::DefinitionsChanged => match self.controller.reload() {
                    Ok(ReloadStatus::Ingested(summary)) => {
                        debug!(?summary, "reload applied");
                    }
                    Ok(ReloadStatus::KeptPrevious) => {}
                    Err(e) => {
                        self.shutdown().await;
                        return Err(e);
                    }
                },
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested");
                    break;
                }
            }
        }

        self.shutdown().await;
        info!("runtime exiting");
        Ok(())
    }

    /// Cancel every schedule and wait for queued audit entries to be written.
    ///
    /// Executions already in flight are not awaited.
    async fn shutdown(&self) {
        let cancelled = self.controller.registry().shutdown();
        debug!(cancelled, "schedules cancelled");

        if let Err(e) = self.audit.flush().await {
            warn!(error = %e, "could not flush audit log on shutdown");
        }
    }
}
