// tests/cold_start.rs

//! Runs the real binary to check process-level exit behaviour.

use std::process::{Command, Stdio};
use std::thread::sleep;
use std::time::Duration;

use tempfile::TempDir;

fn taskcron(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_taskcron"));
    cmd.current_dir(dir.path())
        .arg("--tasks")
        .arg(dir.path().join("tasks.json"))
        .arg("--audit-log")
        .arg(dir.path().join("logs/output.json"))
        .arg("--log-file")
        .arg(dir.path().join("logs/log.txt"))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

#[test]
fn missing_task_list_terminates_with_failure() {
    let dir = TempDir::new().unwrap();

    let output = taskcron(&dir).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no tasks are running"), "{stderr}");
}

#[test]
fn malformed_task_list_terminates_with_failure() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tasks.json"), "[{\"name\": ").unwrap();

    let output = taskcron(&dir).output().unwrap();

    assert!(!output.status.success());
    let log = std::fs::read_to_string(dir.path().join("logs/log.txt")).unwrap();
    assert!(log.contains("invalid task list"), "{log}");
}

#[test]
fn valid_task_list_keeps_running() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tasks.json"),
        r#"[{"name": "noop", "interval": "0 0 0 1 1 *", "exec": "true"}]"#,
    )
    .unwrap();

    let mut child = taskcron(&dir).spawn().unwrap();
    sleep(Duration::from_millis(1500));

    let still_running = child.try_wait().unwrap().is_none();
    child.kill().unwrap();
    let _ = child.wait();

    assert!(still_running, "taskcron exited on a valid task list");
    let audit = std::fs::read_to_string(dir.path().join("logs/output.json")).unwrap();
    assert_eq!(audit.trim(), "[]");
    let log = std::fs::read_to_string(dir.path().join("logs/log.txt")).unwrap();
    assert!(log.contains("new task list ingested"), "{log}");
}

#[test]
fn dry_run_prints_tasks_without_scheduling() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tasks.json"),
        r#"[
            {"name": "ping", "interval": "*/5 * * * * *", "exec": "echo ok", "onFail": "alert"},
            {"name": "bad", "interval": "whenever", "exec": "echo never"}
        ]"#,
    )
    .unwrap();

    let output = taskcron(&dir).arg("--dry-run").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tasks (2):"), "{stdout}");
    assert!(stdout.contains("onFail: alert"), "{stdout}");
    assert!(stdout.contains("REJECTED"), "{stdout}");
    assert!(!dir.path().join("logs/output.json").exists());
}
