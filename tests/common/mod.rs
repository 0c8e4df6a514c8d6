#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use taskcron::audit::{AuditLogHandle, AuditStore, ExecutionOutcome, spawn_audit_writer};
use taskcron::exec::{ExecOptions, ExecutionInvoker};
use taskcron::fs::{FileSystem, MockFileSystem};
use taskcron::reload::ReloadController;
use taskcron::schedule::ScheduleRegistry;

pub use taskcron_test_utils::builders::{TaskDefinitionBuilder, TaskListBuilder};
pub use taskcron_test_utils::fake_process::{FakeProcessInvoker, FakeResponse};
pub use taskcron_test_utils::manual_backend::ManualScheduleBackend;
pub use taskcron_test_utils::{init_tracing, with_timeout};

pub const TASKS_PATH: &str = "todo/tasks.json";
pub const AUDIT_PATH: &str = "logs/output.json";

/// Every component wired against in-memory fakes.
///
/// Must be created inside a Tokio runtime (the audit writer is spawned).
pub struct Harness {
    pub fs: MockFileSystem,
    pub process: FakeProcessInvoker,
    pub backend: ManualScheduleBackend,
    pub audit: AuditLogHandle,
    pub invoker: Arc<ExecutionInvoker>,
    pub registry: Arc<ScheduleRegistry>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_options(100, ExecOptions::default())
    }

    pub fn with_options(max_entries: usize, options: ExecOptions) -> Self {
        let fs = MockFileSystem::new();
        let store = AuditStore::new(Arc::new(fs.clone()), AUDIT_PATH, max_entries);
        store.initialize().expect("initialize audit log");
        let audit = spawn_audit_writer(store);

        let process = FakeProcessInvoker::new();
        let backend = ManualScheduleBackend::new();
        let invoker = Arc::new(ExecutionInvoker::new(
            Arc::new(process.clone()),
            audit.clone(),
            options,
        ));
        let registry = Arc::new(ScheduleRegistry::new(
            Arc::new(backend.clone()),
            Arc::clone(&invoker),
        ));

        Self {
            fs,
            process,
            backend,
            audit,
            invoker,
            registry,
        }
    }

    pub fn controller(&self) -> ReloadController {
        ReloadController::new(
            Arc::new(self.fs.clone()) as Arc<dyn FileSystem>,
            TASKS_PATH,
            Arc::clone(&self.registry),
        )
    }

    pub fn write_tasks(&self, contents: &str) {
        self.fs.add_file(TASKS_PATH, contents);
    }

    /// Flush the writer and return the persisted audit entries.
    pub async fn audit_entries(&self) -> Vec<ExecutionOutcome> {
        self.audit.flush().await.expect("flush audit log");
        AuditStore::new(Arc::new(self.fs.clone()), AUDIT_PATH, usize::MAX)
            .read_all()
            .expect("read audit log")
    }

    /// Wait until at least `n` entries are persisted.
    pub async fn wait_for_entries(&self, n: usize) -> Vec<ExecutionOutcome> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
        loop {
            let entries = self.audit_entries().await;
            if entries.len() >= n {
                return entries;
            }
            if tokio::time::Instant::now() > deadline {
                panic!("expected {n} audit entries, found {}: {:?}", entries.len(), entries);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
