// src/config/settings.rs

//! Effective runtime settings: `Taskcron.toml` values overlaid with CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::loader::{default_settings_path, load_settings};
use crate::config::model::{ConfigSection, SettingsFile};
use crate::errors::{Result, TaskcronError};
use crate::types::{OverlapPolicy, parse_duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tasks_file: PathBuf,
    pub audit_log: PathBuf,
    pub operational_log: PathBuf,
    pub audit_log_max_entries: usize,
    pub overlap: OverlapPolicy,
    pub timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        let section = ConfigSection::default();
        Self {
            tasks_file: section.tasks_file,
            audit_log: section.audit_log,
            operational_log: section.operational_log,
            audit_log_max_entries: section.audit_log_max_entries,
            overlap: section.overlap,
            timeout: None,
        }
    }
}

impl Settings {
    /// Resolve settings for a CLI invocation.
    ///
    /// - `--config PATH` must exist.
    /// - Without `--config`, `Taskcron.toml` is used if present, otherwise
    ///   built-in defaults.
    /// - CLI flags override whatever the file says.
    pub fn resolve(args: &CliArgs) -> Result<Self> {
        let file = match args.config {
            Some(ref path) => load_settings(path)?,
            None => {
                let path = default_settings_path();
                if path.exists() {
                    load_settings(&path)?
                } else {
                    SettingsFile::default()
                }
            }
        };

        let mut section = file.config;
        if let Some(ref p) = args.tasks {
            section.tasks_file = PathBuf::from(p);
        }
        if let Some(ref p) = args.audit_log {
            section.audit_log = PathBuf::from(p);
        }
        if let Some(ref p) = args.log_file {
            section.operational_log = PathBuf::from(p);
        }
        if let Some(n) = args.max_entries {
            section.audit_log_max_entries = n;
        }
        if let Some(overlap) = args.overlap {
            section.overlap = overlap.into();
        }
        if let Some(ref t) = args.timeout {
            section.timeout = Some(t.clone());
        }

        Settings::try_from(section)
    }
}

impl TryFrom<ConfigSection> for Settings {
    type Error = TaskcronError;

    fn try_from(section: ConfigSection) -> std::result::Result<Self, Self::Error> {
        if section.audit_log_max_entries == 0 {
            return Err(TaskcronError::ConfigError(
                "[config].audit_log_max_entries must be >= 1 (got 0)".to_string(),
            ));
        }

        let timeout = match section.timeout {
            Some(ref s) => Some(parse_duration(s).map_err(|e| {
                TaskcronError::ConfigError(format!("[config].timeout: {e}"))
            })?),
            None => None,
        };

        Ok(Self {
            tasks_file: section.tasks_file,
            audit_log: section.audit_log,
            operational_log: section.operational_log,
            audit_log_max_entries: section.audit_log_max_entries,
            overlap: section.overlap,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_from(toml_src: &str) -> ConfigSection {
        toml::from_str::<SettingsFile>(toml_src).unwrap().config
    }

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::try_from(section_from("")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.audit_log_max_entries, 100);
        assert_eq!(settings.tasks_file, PathBuf::from("todo/tasks.json"));
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn file_values_are_applied() {
        let settings = Settings::try_from(section_from(
            r#"
[config]
audit_log_max_entries = 5
overlap = "skip"
timeout = "30s"
"#,
        ))
        .unwrap();
        assert_eq!(settings.audit_log_max_entries, 5);
        assert_eq!(settings.overlap, OverlapPolicy::Skip);
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_cap_is_rejected() {
        let err = Settings::try_from(section_from("[config]\naudit_log_max_entries = 0\n"))
            .unwrap_err();
        assert!(matches!(err, TaskcronError::ConfigError(_)));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Settings::try_from(section_from("[config]\ntimeout = \"soon\"\n")).unwrap_err();
        assert!(matches!(err, TaskcronError::ConfigError(msg) if msg.contains("timeout")));
    }
}
