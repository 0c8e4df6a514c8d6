// src/audit/store.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::audit::model::ExecutionOutcome;
use crate::errors::Result;
use crate::fs::FileSystem;

/// The audit log file: a JSON array of [`ExecutionOutcome`]s, newest first,
/// never longer than `max_entries`.
///
/// `append` is a plain read-modify-write and is not safe to call from several
/// places at once; go through [`crate::audit::AuditLogHandle`] instead.
#[derive(Debug)]
pub struct AuditStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    max_entries: usize,
}

impl AuditStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            fs,
            path: path.into(),
            max_entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Create the audit file with an empty sequence if it does not exist yet.
    ///
    /// Returns `true` if the file was created.
    pub fn initialize(&self) -> Result<bool> {
        if self.fs.exists(&self.path) {
            return Ok(false);
        }
        self.replace_contents(b"[]")?;
        info!(path = ?self.path, "created empty audit log");
        Ok(true)
    }

    /// Read the whole persisted sequence.
    ///
    /// Fails if the file is missing or does not hold a JSON array of outcomes.
    pub fn read_all(&self) -> Result<Vec<ExecutionOutcome>> {
        let contents = self.fs.read_to_string(&self.path)?;
        let entries: Vec<ExecutionOutcome> = serde_json::from_str(&contents)?;
        Ok(entries)
    }

    /// Prepend `outcome`, drop entries past the cap, and write the file back.
    pub fn append(&self, outcome: ExecutionOutcome) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(0, outcome);
        entries.truncate(self.max_entries);

        let serialized = serde_json::to_string_pretty(&entries)?;
        self.replace_contents(serialized.as_bytes())
    }

    /// Write to a sibling staging file, then rename it over the log. A write
    /// that fails part way leaves the previous log intact.
    fn replace_contents(&self, contents: &[u8]) -> Result<()> {
        let staging = self.staging_path();
        self.fs.write(&staging, contents)?;
        self.fs.rename(&staging, &self.path)?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TaskcronError;
    use crate::fs::MockFileSystem;
    use chrono::Utc;

    fn outcome(task: &str) -> ExecutionOutcome {
        ExecutionOutcome {
            task: task.to_string(),
            success: true,
            timestamp: Utc::now(),
            execution_time: 3,
            message: "ok\n".to_string(),
        }
    }

    fn store(fs: &MockFileSystem, max: usize) -> AuditStore {
        AuditStore::new(Arc::new(fs.clone()), "logs/output.json", max)
    }

    #[test]
    fn append_prepends_and_truncates() {
        let fs = MockFileSystem::new();
        let store = store(&fs, 2);
        store.initialize().unwrap();

        store.append(outcome("a")).unwrap();
        store.append(outcome("b")).unwrap();
        store.append(outcome("c")).unwrap();

        let names: Vec<String> = store.read_all().unwrap().into_iter().map(|o| o.task).collect();
        assert_eq!(names, vec!["c".to_string(), "b".to_string()]);
    }

    #[test]
    fn append_fails_without_an_existing_sequence() {
        let fs = MockFileSystem::new();
        let store = store(&fs, 10);
        assert!(store.append(outcome("a")).is_err());

        fs.add_file("logs/output.json", "{not json");
        assert!(matches!(
            store.append(outcome("a")),
            Err(TaskcronError::JsonError(_))
        ));
    }

    #[test]
    fn initialize_keeps_existing_entries() {
        let fs = MockFileSystem::new();
        let store = store(&fs, 10);
        assert!(store.initialize().unwrap());
        store.append(outcome("a")).unwrap();
        assert!(!store.initialize().unwrap());
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn torn_write_leaves_the_previous_log_readable() {
        let fs = MockFileSystem::new();
        let store = store(&fs, 10);
        store.initialize().unwrap();
        store.append(outcome("a")).unwrap();

        fs.set_torn_writes(true);
        assert!(store.append(outcome("b")).is_err());
        assert_eq!(store.read_all().unwrap().len(), 1);

        fs.set_torn_writes(false);
        store.append(outcome("c")).unwrap();
        let names: Vec<String> = store.read_all().unwrap().into_iter().map(|o| o.task).collect();
        assert_eq!(names, vec!["c".to_string(), "a".to_string()]);
        assert!(!fs.exists(Path::new("logs/output.json.tmp")));
    }

    #[test]
    fn file_uses_camel_case_field_names() {
        let fs = MockFileSystem::new();
        let store = store(&fs, 10);
        store.initialize().unwrap();
        store.append(outcome("ping")).unwrap();

        let raw = fs.contents("logs/output.json").unwrap();
        assert!(raw.contains("\"executionTime\": 3"));
        assert!(raw.contains("\"task\": \"ping\""));
        assert!(raw.contains("\"message\": \"ok\\n\""));
    }
}
