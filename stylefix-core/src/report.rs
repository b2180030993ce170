//! Per-run reporting
//!
//! A [`RunReport`] aggregates the outcome of one pass: how many files were
//! scanned and changed, the per-file change and violation counts, and the
//! files that had to be skipped. The report serializes to JSON for tooling.

use std::{
    collections::BTreeMap,
    path::{
        Path,
        PathBuf,
    },
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::FixError;

/// Result of running a pass over one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    /// File that was processed
    pub path:      PathBuf,
    /// Individual changes applied (or that would be applied in dry-run)
    pub changes:   usize,
    /// Whether the content differs from the original
    pub changed:   bool,
    /// Violations left in the file after the pass
    pub remaining: usize,
    /// Backup written before the file was replaced
    pub backup:    Option<PathBuf>,
}

impl FileOutcome {
    /// Outcome for a file the pass left alone
    pub fn unchanged(path: &Path) -> Self {
        Self {
            path:      path.to_path_buf(),
            changes:   0,
            changed:   false,
            remaining: 0,
            backup:    None,
        }
    }
}

/// A file that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    /// Path relative to the root
    pub file:    String,
    /// Human-readable cause
    pub message: String,
}

/// Aggregate outcome of a pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Version of the report format
    pub version:       String,
    /// Pass that produced the report
    pub pass:          String,
    /// When the run started (RFC 3339)
    pub timestamp:     String,
    /// Root directory that was scanned
    pub root:          String,
    /// Whether writes were suppressed
    pub dry_run:       bool,
    /// Candidate files visited
    pub files_scanned: usize,
    /// Files whose content changed
    pub files_changed: usize,
    /// Total individual changes
    pub replacements:  usize,
    /// Changes per file, relative to the root
    pub changes:       BTreeMap<String, usize>,
    /// Violations left per file, relative to the root
    pub violations:    BTreeMap<String, usize>,
    /// Backups written, relative to the root
    pub backups:       Vec<String>,
    /// Files that were skipped because of an error
    pub failures:      Vec<FileFailure>,
    /// Duration of the run in milliseconds
    pub duration_ms:   u64,
}

impl RunReport {
    /// Create an empty report
    pub fn new(pass: &str, root: &Path, dry_run: bool) -> Self {
        Self {
            version: "1.0".to_string(),
            pass: pass.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            root: root.to_string_lossy().to_string(),
            dry_run,
            files_scanned: 0,
            files_changed: 0,
            replacements: 0,
            changes: BTreeMap::new(),
            violations: BTreeMap::new(),
            backups: Vec::new(),
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Path of `path` relative to the report root, with `/` separators
    pub fn relative(&self, path: &Path) -> String {
        let rel = pathdiff::diff_paths(path, &self.root).unwrap_or_else(|| path.to_path_buf());
        rel.to_string_lossy().replace('\\', "/")
    }

    /// Record the outcome of one file
    pub fn record(&mut self, outcome: FileOutcome) {
        let file = self.relative(&outcome.path);
        if outcome.changed {
            self.files_changed += 1;
            self.replacements += outcome.changes;
            self.changes.insert(file.clone(), outcome.changes);
        }
        if outcome.remaining > 0 {
            self.violations.insert(file, outcome.remaining);
        }
        if let Some(backup) = &outcome.backup {
            let backup = self.relative(backup);
            self.backups.push(backup);
        }
    }

    /// Record a file that was skipped
    pub fn record_failure(&mut self, path: &Path, error: &FixError) {
        let file = self.relative(path);
        self.failures.push(FileFailure {
            file,
            message: error.to_string(),
        });
    }

    /// Finalize the report with timing information
    pub fn finish(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    /// Violations left across all files
    pub fn total_violations(&self) -> usize {
        self.violations.values().sum()
    }

    /// Check if any file had to be skipped
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// No violations remain and every file was processed
    pub fn is_clean(&self) -> bool {
        self.total_violations() == 0 && !self.has_failures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(path: &str, changes: usize, remaining: usize) -> FileOutcome {
        FileOutcome {
            path: PathBuf::from(path),
            changes,
            changed: changes > 0,
            remaining,
            backup: None,
        }
    }

    #[test]
    fn test_report_aggregates() {
        let mut report = RunReport::new("units", Path::new("/app/src"), false);
        report.record(outcome("/app/src/a.css", 3, 0));
        report.record(outcome("/app/src/b/c.css", 1, 0));
        report.record(FileOutcome::unchanged(Path::new("/app/src/d.css")));
        let report = report.finish(Duration::from_millis(12));

        assert_eq!(report.files_changed, 2);
        assert_eq!(report.replacements, 4);
        assert_eq!(report.changes.get("b/c.css"), Some(&1));
        assert_eq!(report.total_violations(), 0);
        assert_eq!(report.duration_ms, 12);
        assert!(report.is_clean());
    }

    #[test]
    fn test_dry_run_violations() {
        let mut report = RunReport::new("units", Path::new("/app/src"), true);
        report.record(outcome("/app/src/a.css", 3, 3));
        report.record(outcome("/app/src/b.css", 2, 2));

        assert_eq!(report.total_violations(), 5);
        assert_eq!(report.violations.keys().collect::<Vec<_>>(), vec!["a.css", "b.css"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_failures_make_report_unclean() {
        let mut report = RunReport::new("units", Path::new("/app/src"), false);
        let err = FixError::Encoding {
            path: PathBuf::from("/app/src/bin.css"),
        };
        report.record_failure(Path::new("/app/src/bin.css"), &err);

        assert!(report.has_failures());
        assert_eq!(report.failures[0].file, "bin.css");
        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_serializes() {
        let report = RunReport::new("selectors", Path::new("src"), false);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pass"], "selectors");
        assert_eq!(json["files_changed"], 0);
        assert!(json["violations"].is_object());
    }
}
