// src/lib.rs

pub mod audit;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod reload;
pub mod schedule;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::audit::{AuditStore, spawn_audit_writer};
use crate::cli::CliArgs;
use crate::config::{Settings, TaskList, load_and_validate};
use crate::engine::{Runtime, RuntimeEvent};
use crate::exec::{ExecOptions, ExecutionInvoker, TokioProcessInvoker};
use crate::fs::{FileSystem, RealFileSystem};
use crate::reload::ReloadController;
use crate::schedule::{CronExpr, ScheduleRegistry, TokioScheduleBackend};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the audit log writer
/// - the execution invoker and schedule registry
/// - the cold-start load of the task list
/// - the definition watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs, settings: Settings) -> Result<()> {
    if args.dry_run {
        let tasks = load_and_validate(&settings.tasks_file)?;
        print_dry_run(&settings, &tasks);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    // Audit log + its single writer.
    let store = AuditStore::new(
        Arc::clone(&fs),
        &settings.audit_log,
        settings.audit_log_max_entries,
    );
    if let Err(e) = store.initialize() {
        warn!(path = ?settings.audit_log, error = %e, "could not prepare audit log");
    }
    let audit = spawn_audit_writer(store);

    // Invoker + registry.
    let options = ExecOptions {
        overlap: settings.overlap,
        timeout: settings.timeout,
    };
    let invoker = Arc::new(ExecutionInvoker::new(
        Arc::new(TokioProcessInvoker),
        audit.clone(),
        options,
    ));
    let registry = Arc::new(ScheduleRegistry::new(Arc::new(TokioScheduleBackend), invoker));

    // Cold start: an invalid source here is fatal.
    let controller = ReloadController::new(fs, &settings.tasks_file, registry);
    controller.reload()?;

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);

    let _watcher_handle = crate::reload::spawn_definition_watcher(&settings.tasks_file, rt_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    info!(
        tasks_file = ?settings.tasks_file,
        audit_log = ?settings.audit_log,
        overlap = ?settings.overlap,
        timeout = ?settings.timeout,
        "taskcron started"
    );

    let runtime = Runtime::new(controller, rt_rx, audit);
    runtime.run().await?;
    Ok(())
}

/// Simple dry-run output: print tasks, schedules and commands.
fn print_dry_run(settings: &Settings, tasks: &TaskList) {
    println!("taskcron dry-run");
    println!("  tasks_file = {}", settings.tasks_file.display());
    println!("  audit_log = {}", settings.audit_log.display());
    println!("  audit_log_max_entries = {}", settings.audit_log_max_entries);
    println!("  overlap = {:?}", settings.overlap);
    if let Some(timeout) = settings.timeout {
        println!("  timeout = {:?}", timeout);
    }
    println!();

    let now = Utc::now();
    println!("tasks ({}):", tasks.len());
    for task in tasks.iter() {
        println!("  - {}", task.name);
        match CronExpr::parse(&task.interval) {
            Ok(cron) => match cron.next_after(&now) {
                Some(next) => println!("      interval: {} (next: {})", cron, next.to_rfc3339()),
                None => println!("      interval: {} (no further firings)", cron),
            },
            Err(e) => println!("      interval: {} (REJECTED: {})", task.interval, e),
        }
        println!("      exec: {}", task.exec);
        if let Some(hook) = task.success_hook() {
            println!("      onSuccess: {hook}");
        }
        if let Some(hook) = task.fail_hook() {
            println!("      onFail: {hook}");
        }
    }

    debug!("dry-run complete (no execution)");
}
