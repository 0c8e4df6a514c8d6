// src/config/mod.rs

//! Task definitions and settings for taskcron.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load the task definition source and the settings file (`loader.rs`).
//! - Validate the structure of a task list (`validate.rs`).
//! - Merge settings file values with CLI overrides (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{
    DefinitionFormat, default_settings_path, load_and_validate, load_and_validate_with,
    load_from_path, load_settings, parse_task_list,
};
pub use model::{ConfigSection, RawTaskList, SettingsFile, TaskDefinition, TaskList};
pub use settings::Settings;
