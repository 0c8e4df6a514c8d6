// src/schedule/backend.rs

//! Pluggable scheduling backend.
//!
//! The registry asks a [`ScheduleBackend`] to call a callback whenever a cron
//! expression matches, and gets back a [`ScheduleHandle`] that stops those
//! calls. Production uses [`TokioScheduleBackend`]; tests provide a backend
//! that fires on demand.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::schedule::cron::CronExpr;

/// Callback invoked on every firing. Must return quickly.
pub type FireFn = Arc<dyn Fn() + Send + Sync>;

/// Trait abstracting how cron firings are produced.
pub trait ScheduleBackend: Send + Sync + Debug {
    /// Start calling `on_fire` each time `expr` matches, until the returned
    /// handle is cancelled or dropped.
    fn schedule(&self, task: &str, expr: &CronExpr, on_fire: FireFn) -> ScheduleHandle;
}

/// Live registration with a [`ScheduleBackend`].
///
/// Cancelling stops future firings only; executions already started keep
/// running. Dropping the handle cancels it.
#[derive(Debug)]
pub struct ScheduleHandle {
    cancel: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl ScheduleHandle {
    pub fn new(cancel: oneshot::Sender<()>, join: JoinHandle<()>) -> Self {
        Self {
            cancel: Some(cancel),
            join: Some(join),
        }
    }

    /// Handle for a backend that drives firings without a task of its own.
    pub fn detached(cancel: oneshot::Sender<()>) -> Self {
        Self {
            cancel: Some(cancel),
            join: None,
        }
    }

    /// Stop future firings.
    ///
    /// Returns `false` if the handle was already cancelled or the schedule had
    /// already ended by itself.
    pub fn cancel(&mut self) -> bool {
        let delivered = match self.cancel.take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        };
        if let Some(join) = self.join.take() {
            join.abort();
        }
        delivered
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_none()
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Production backend: one Tokio timer task per scheduled task.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduleBackend;

impl ScheduleBackend for TokioScheduleBackend {
    fn schedule(&self, task: &str, expr: &CronExpr, on_fire: FireFn) -> ScheduleHandle {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let join = tokio::spawn(run_ticker(task.to_string(), expr.clone(), on_fire, cancel_rx));
        ScheduleHandle::new(cancel_tx, join)
    }
}

async fn run_ticker(
    task: String,
    expr: CronExpr,
    on_fire: FireFn,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    debug!(task = %task, interval = %expr, "schedule started");

    let mut last: Option<DateTime<Utc>> = None;

    loop {
        let now = Utc::now();
        // Never fire the same instant twice, even if the timer wakes early.
        let from = match last {
            Some(prev) if prev > now => prev,
            _ => now,
        };

        let Some(next) = expr.next_after(&from) else {
            info!(task = %task, interval = %expr, "schedule has no further firings");
            break;
        };
        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            biased;

            _ = &mut cancel_rx => {
                debug!(task = %task, "schedule cancelled");
                break;
            }

            _ = tokio::time::sleep(wait) => {
                debug!(task = %task, at = %next, "schedule fired");
                last = Some(next);
                on_fire();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, FireFn) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[tokio::test]
    async fn every_second_schedule_fires() {
        let (count, on_fire) = counter();
        let cron = CronExpr::parse("* * * * * *").unwrap();
        let _handle = TokioScheduleBackend.schedule("tick", &cron, on_fire);

        tokio::time::sleep(Duration::from_millis(2300)).await;
        assert!(count.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn cancelled_schedule_stops_firing() {
        let (count, on_fire) = counter();
        let cron = CronExpr::parse("* * * * * *").unwrap();
        let mut handle = TokioScheduleBackend.schedule("tick", &cron, on_fire);

        assert!(handle.cancel());
        assert!(handle.is_cancelled());
        assert!(!handle.cancel());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dropping_the_handle_cancels() {
        let (count, on_fire) = counter();
        let cron = CronExpr::parse("* * * * * *").unwrap();
        drop(TokioScheduleBackend.schedule("tick", &cron, on_fire));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
