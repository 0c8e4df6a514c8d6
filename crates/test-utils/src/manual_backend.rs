use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use taskcron::schedule::{CronExpr, FireFn, ScheduleBackend, ScheduleHandle};

struct Registration {
    task: String,
    interval: String,
    on_fire: FireFn,
    cancel_rx: oneshot::Receiver<()>,
}

impl Registration {
    fn is_live(&mut self) -> bool {
        matches!(self.cancel_rx.try_recv(), Err(TryRecvError::Empty))
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("task", &self.task)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// A schedule backend that never fires by itself.
///
/// Tests call [`ManualScheduleBackend::fire`] to simulate the cron expression
/// matching. Cancelled registrations are remembered but never fire again.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduleBackend {
    registrations: Arc<Mutex<Vec<Registration>>>,
}

impl ManualScheduleBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every live registration for `task`; returns how many fired.
    pub fn fire(&self, task: &str) -> usize {
        let callbacks: Vec<FireFn> = {
            let mut regs = self.registrations.lock().unwrap();
            regs.iter_mut()
                .filter(|r| r.task == task)
                .filter_map(|r| r.is_live().then(|| Arc::clone(&r.on_fire)))
                .collect()
        };
        for cb in callbacks.iter() {
            cb();
        }
        callbacks.len()
    }

    /// Names with a live (uncancelled) registration, sorted.
    pub fn live_tasks(&self) -> Vec<String> {
        let mut regs = self.registrations.lock().unwrap();
        let mut names: Vec<String> = regs
            .iter_mut()
            .filter_map(|r| r.is_live().then(|| r.task.clone()))
            .collect();
        names.sort();
        names
    }

    /// Interval of the live registration for `task`.
    pub fn live_interval(&self, task: &str) -> Option<String> {
        let mut regs = self.registrations.lock().unwrap();
        regs.iter_mut()
            .filter(|r| r.task == task)
            .find_map(|r| r.is_live().then(|| r.interval.clone()))
    }

    /// Number of `schedule` calls ever made.
    pub fn total_registrations(&self) -> usize {
        self.registrations.lock().unwrap().len()
    }
}

impl ScheduleBackend for ManualScheduleBackend {
    fn schedule(&self, task: &str, expr: &CronExpr, on_fire: FireFn) -> ScheduleHandle {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.registrations.lock().unwrap().push(Registration {
            task: task.to_string(),
            interval: expr.as_str().to_string(),
            on_fire,
            cancel_rx,
        });
        ScheduleHandle::detached(cancel_tx)
    }
}
