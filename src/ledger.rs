//! Append-only change log.
//!
//! One line per decision:
//!
//! ```text
//! 2024-04-02 14:03:11 Added: guava.jar (com.google.guava:guava:33.1.0-jre)
//! 2024-04-02 14:03:12 Updated: test.jar (com.example:test:2.0.0) [Previous: 1.0.0]
//! ```

use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Added,
    Updated,
    Skipped,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Added => "Added",
            Action::Updated => "Updated",
            Action::Skipped => "Skipped",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub timestamp: NaiveDateTime,
    pub action: Action,
    pub file_name: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Only rendered for [`Action::Updated`].
    pub previous_version: Option<String>,
}

impl ChangeRecord {
    pub fn now(
        action: Action,
        file_name: impl Into<String>,
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        previous_version: Option<String>,
    ) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            action,
            file_name: file_name.into(),
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            previous_version,
        }
    }

    pub fn render(&self) -> String {
        let mut line = format!(
            "{} {}: {} ({}:{}:{})",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.action,
            self.file_name,
            self.group_id,
            self.artifact_id,
            self.version
        );
        if self.action == Action::Updated {
            line.push_str(&format!(
                " [Previous: {}]",
                self.previous_version.as_deref().unwrap_or_default()
            ));
        }
        line
    }
}

/// Change log bound to a single file for its whole lifetime.
#[derive(Debug, Clone)]
pub struct ChangeLedger {
    path: PathBuf,
}

impl ChangeLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line, creating the file if needed. Failures are logged,
    /// never returned.
    pub fn add_entry(&self, record: &ChangeRecord) {
        let line = record.render();
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", line));
        match result {
            Ok(()) => tracing::debug!("ledger: {}", line),
            Err(e) => tracing::error!(
                "failed to write changes entry to {}: {}",
                self.path.display(),
                e
            ),
        }
    }

    pub fn record(
        &self,
        action: Action,
        file_name: &str,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        previous_version: Option<&str>,
    ) {
        let record = ChangeRecord::now(
            action,
            file_name,
            group_id,
            artifact_id,
            version,
            previous_version.map(str::to_string),
        );
        self.add_entry(&record);
    }

    /// Whole ledger as text; empty if it cannot be read.
    pub fn read_to_string(&self) -> String {
        fs::read_to_string(&self.path).unwrap_or_else(|e| {
            tracing::error!("failed to read changes file {}: {}", self.path.display(), e);
            String::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_record(action: Action, previous: Option<&str>) -> ChangeRecord {
        ChangeRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 4, 2)
                .and_then(|d| d.and_hms_opt(9, 5, 7))
                .unwrap(),
            action,
            file_name: "test.jar".to_string(),
            group_id: "com.example".to_string(),
            artifact_id: "test".to_string(),
            version: "2.0.0".to_string(),
            previous_version: previous.map(str::to_string),
        }
    }

    #[test]
    fn test_render_added() {
        assert_eq!(
            fixed_record(Action::Added, None).render(),
            "2024-04-02 09:05:07 Added: test.jar (com.example:test:2.0.0)"
        );
    }

    #[test]
    fn test_render_updated_has_previous() {
        assert_eq!(
            fixed_record(Action::Updated, Some("1.0.0")).render(),
            "2024-04-02 09:05:07 Updated: test.jar (com.example:test:2.0.0) [Previous: 1.0.0]"
        );
    }

    #[test]
    fn test_render_skipped_ignores_previous() {
        let line = fixed_record(Action::Skipped, Some("1.0.0")).render();
        assert!(line.ends_with("Skipped: test.jar (com.example:test:2.0.0)"));
    }

    #[test]
    fn test_round_trip_appends() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ChangeLedger::new(dir.path().join("changes.log"));
        ledger.record(Action::Added, "guava.jar", "com.google.guava", "guava", "33.1.0-jre", None);
        ledger.record(Action::Updated, "test.jar", "com.example", "test", "2.0.0", Some("1.0.0"));

        let content = ledger.read_to_string();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Added: guava.jar (com.google.guava:guava:33.1.0-jre)"));
        assert!(lines[1].contains("Updated: test.jar (com.example:test:2.0.0) [Previous: 1.0.0]"));
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ChangeLedger::new(dir.path().join("missing").join("changes.log"));
        ledger.record(Action::Added, "a.jar", "g", "a", "1", None);
        assert_eq!(ledger.read_to_string(), "");
    }
}
