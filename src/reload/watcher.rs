// src/reload/watcher.rs

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::RuntimeEvent;

/// Bursts of notifications closer together than this collapse into one reload.
const COALESCE_WINDOW: Duration = Duration::from_millis(100);

/// Handle for the definition watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive; dropping it stops
/// watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch the task definition file and send
/// `RuntimeEvent::DefinitionsChanged` whenever it changes.
///
/// The containing directory is watched (non-recursively) rather than the
/// file itself, so editors that save by replacing the file are still seen.
pub fn spawn_definition_watcher(
    source: impl AsRef<Path>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let source = source.as_ref();
    let file_name: OsString = source
        .file_name()
        .ok_or_else(|| anyhow!("task definition path {:?} has no file name", source))?
        .to_os_string();

    let dir = match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let dir = dir.canonicalize().unwrap_or(dir);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("taskcron: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("taskcron: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching {:?}", dir))?;

    info!(dir = ?dir, file = ?file_name, "task definition watcher started");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !is_relevant(&event, &file_name) {
                continue;
            }
            debug!(?event, "task definition changed");

            tokio::time::sleep(COALESCE_WINDOW).await;
            while event_rx.try_recv().is_ok() {}

            if runtime_tx.send(RuntimeEvent::DefinitionsChanged).await.is_err() {
                break;
            }
        }
        debug!("definition watcher loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Does `event` report a change to a file called `file_name`?
fn is_relevant(event: &Event, file_name: &OsStr) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name))
}
