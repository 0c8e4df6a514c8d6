// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawTaskList, SettingsFile, TaskDefinition, TaskList};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

/// Document format of the task definition source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    /// A JSON array of task records.
    Json,
    /// A TOML document with one `[[task]]` table per record.
    Toml,
}

impl DefinitionFormat {
    /// Pick the format from the file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DefinitionFormat::Toml,
            _ => DefinitionFormat::Json,
        }
    }
}

/// Parse a task definition document without validating it.
pub fn parse_task_list(contents: &str, format: DefinitionFormat) -> Result<RawTaskList> {
    match format {
        DefinitionFormat::Json => {
            let tasks: Vec<TaskDefinition> = serde_json::from_str(contents)?;
            Ok(RawTaskList { tasks })
        }
        DefinitionFormat::Toml => {
            let raw: RawTaskList = toml::from_str(contents)?;
            Ok(raw)
        }
    }
}

/// Load the task definition source through `fs` and return the raw list.
///
/// This only performs deserialization; use [`load_and_validate_with`] to also
/// run structural validation.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawTaskList> {
    let path = path.as_ref();
    let contents = fs.read_to_string(path)?;
    parse_task_list(&contents, DefinitionFormat::from_path(path))
}

/// Load and structurally validate the task definition source through `fs`.
pub fn load_and_validate_with(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<TaskList> {
    let raw = load_from_path(fs, path)?;
    TaskList::try_from(raw)
}

/// Load and validate the task definition source from the real filesystem.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<TaskList> {
    load_and_validate_with(&RealFileSystem, path)
}

/// Load the settings file (`Taskcron.toml`).
pub fn load_settings(path: impl AsRef<Path>) -> Result<SettingsFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let settings: SettingsFile = toml::from_str(&contents)?;
    Ok(settings)
}

/// Settings file looked up when `--config` is not given.
pub fn default_settings_path() -> PathBuf {
    PathBuf::from("Taskcron.toml")
}
