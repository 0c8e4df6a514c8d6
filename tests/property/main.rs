// tests/property/main.rs

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;
use taskcron::audit::{AuditStore, ExecutionOutcome, spawn_audit_writer};
use taskcron::exec::{ExecOptions, ExecutionInvoker};
use taskcron::fs::MockFileSystem;
use taskcron::schedule::ScheduleRegistry;
use taskcron_test_utils::builders::TaskListBuilder;
use taskcron_test_utils::fake_process::FakeProcessInvoker;
use taskcron_test_utils::manual_backend::ManualScheduleBackend;

fn outcome(i: usize) -> ExecutionOutcome {
    ExecutionOutcome {
        task: format!("task_{i}"),
        success: i % 2 == 0,
        timestamp: Utc::now(),
        execution_time: i as u64,
        message: String::new(),
    }
}

// Task-name sets drawn from a small alphabet so successive reloads overlap.
fn name_set() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set("[a-e]{1,2}", 0..6)
}

proptest! {
    #[test]
    fn audit_log_never_exceeds_cap(cap in 1usize..20, appends in 0usize..60) {
        let fs = MockFileSystem::new();
        let store = AuditStore::new(Arc::new(fs), "logs/output.json", cap);
        store.initialize().unwrap();

        for i in 0..appends {
            store.append(outcome(i)).unwrap();
            let entries = store.read_all().unwrap();
            prop_assert!(entries.len() <= cap);
            prop_assert_eq!(&entries[0].task, &format!("task_{i}"));
        }

        prop_assert_eq!(store.read_all().unwrap().len(), appends.min(cap));
    }

    #[test]
    fn reconcile_installs_exactly_the_incoming_names(
        reloads in proptest::collection::vec(name_set(), 1..5)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let _guard = rt.enter();

        let fs = MockFileSystem::new();
        let store = AuditStore::new(Arc::new(fs), "logs/output.json", 10);
        let audit = spawn_audit_writer(store);
        let invoker = Arc::new(ExecutionInvoker::new(
            Arc::new(FakeProcessInvoker::new()),
            audit,
            ExecOptions::default(),
        ));
        let backend = ManualScheduleBackend::new();
        let registry = ScheduleRegistry::new(Arc::new(backend.clone()), invoker);

        for names in reloads {
            let mut builder = TaskListBuilder::new();
            for name in names.iter() {
                builder = builder.with(name, "* * * * * *", "true");
            }
            registry.reconcile(builder.build());

            let expected: Vec<String> = names.into_iter().collect();
            prop_assert_eq!(registry.current_names(), expected.clone());
            prop_assert_eq!(backend.live_tasks(), expected);
        }
    }
}
