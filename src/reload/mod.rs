// src/reload/mod.rs

//! Hot reload of the task definition source.
//!
//! - [`controller`] re-reads and validates the source and hands it to the
//!   schedule registry, keeping the last good set on failure.
//! - [`watcher`] turns filesystem notifications for the source file into
//!   `RuntimeEvent::DefinitionsChanged`.

pub mod controller;
pub mod watcher;

pub use controller::{ReloadController, ReloadStatus};
pub use watcher::{WatcherHandle, spawn_definition_watcher};
