//! Rewrite driver shared by every pass
//!
//! A pass only supplies a pure text transformation through [`Rewrite`]. This
//! module reads each file, applies the transformation, and writes the result
//! back only when the bytes differ. Passes that ask for it get a sibling
//! backup of the original before the write.

use std::{
    fs,
    path::Path,
    time::Instant,
};

use tracing::{
    debug,
    warn,
};

use crate::{
    config::FixConfig,
    error::{
        FixError,
        FixResult,
    },
    report::{
        FileOutcome,
        RunReport,
    },
    walk::SourceWalker,
};

/// Output of a text transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// Transformed text
    pub text:    String,
    /// Number of individual changes applied
    pub changes: usize,
}

impl Rewritten {
    /// Text returned as-is
    pub fn unchanged(text: &str) -> Self {
        Self {
            text:    text.to_string(),
            changes: 0,
        }
    }
}

/// A batch text transformation applied file by file
pub trait Rewrite {
    /// Short name used in reports
    fn name(&self) -> &'static str;

    /// Transform the full content of one file
    fn apply(&self, text: &str) -> Rewritten;

    /// Whether an unmodified copy must be saved before writing
    fn takes_backup(&self) -> bool {
        false
    }

    /// Violations still present in `text`
    fn violations(&self, text: &str) -> usize {
        self.apply(text).changes
    }
}

/// Read a file as UTF-8 text
pub fn read_text(path: &Path) -> FixResult<String> {
    let bytes = fs::read(path).map_err(|e| FixError::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| FixError::Encoding {
        path: path.to_path_buf(),
    })
}

/// Apply `rewrite` to a single file
///
/// The file is written only when the transformed text differs from the
/// original, and never in dry-run mode. Any backup is written before the file
/// itself is replaced.
pub fn rewrite_file(
    path: &Path,
    rewrite: &dyn Rewrite,
    config: &FixConfig,
) -> FixResult<FileOutcome> {
    let original = read_text(path)?;
    let result = rewrite.apply(&original);

    if result.text == original {
        debug!(pass = rewrite.name(), path = %path.display(), "no changes");
        return Ok(FileOutcome::unchanged(path));
    }

    let mut backup = None;
    let remaining = if config.dry_run {
        result.changes
    } else {
        if rewrite.takes_backup() {
            let backup_path = config.backup_path(path);
            fs::write(&backup_path, &original).map_err(|e| FixError::io(&backup_path, e))?;
            backup = Some(backup_path);
        }
        fs::write(path, &result.text).map_err(|e| FixError::io(path, e))?;
        rewrite.violations(&result.text)
    };

    debug!(
        pass = rewrite.name(),
        path = %path.display(),
        changes = result.changes,
        dry_run = config.dry_run,
        "rewrote file"
    );

    Ok(FileOutcome {
        path: path.to_path_buf(),
        changes: result.changes,
        changed: true,
        remaining,
        backup,
    })
}

/// Run `rewrite` over every candidate file below `config.root`
///
/// Per-file failures are recorded in the report and the run continues. Only
/// an unreadable root aborts the pass.
pub fn run_pass(rewrite: &dyn Rewrite, config: &FixConfig) -> FixResult<RunReport> {
    let start = Instant::now();
    let walker = SourceWalker::new(config);
    let files = walker.files()?;

    let mut report = RunReport::new(rewrite.name(), &config.root, config.dry_run);

    for entry in files {
        match entry {
            Ok(path) => {
                report.files_scanned += 1;
                match rewrite_file(&path, rewrite, config) {
                    Ok(outcome) => report.record(outcome),
                    Err(e) => {
                        warn!(pass = rewrite.name(), path = %path.display(), error = %e, "skipping file");
                        report.record_failure(&path, &e);
                    },
                }
            },
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| config.root.clone());
                let e = FixError::from(e);
                warn!(pass = rewrite.name(), path = %path.display(), error = %e, "skipping entry");
                report.record_failure(&path, &e);
            },
        }
    }

    Ok(report.finish(start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Upper-cases the text and asks for a backup
    struct Shout;

    impl Rewrite for Shout {
        fn name(&self) -> &'static str {
            "shout"
        }

        fn apply(&self, text: &str) -> Rewritten {
            let upper = text.to_uppercase();
            let changes = text.chars().filter(|c| c.is_lowercase()).count();
            Rewritten {
                text: upper,
                changes,
            }
        }

        fn takes_backup(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_rewrite_writes_backup_first() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.css");
        fs::write(&file, "abc").unwrap();
        let config = FixConfig::default();

        let outcome = rewrite_file(&file, &Shout, &config).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.changes, 3);
        assert_eq!(outcome.remaining, 0);
        assert_eq!(fs::read_to_string(&file).unwrap(), "ABC");
        assert_eq!(fs::read_to_string(dir.path().join("a.css.backup")).unwrap(), "abc");
    }

    #[test]
    fn test_unchanged_file_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.css");
        fs::write(&file, "ABC").unwrap();

        let outcome = rewrite_file(&file, &Shout, &FixConfig::default()).unwrap();
        assert!(!outcome.changed);
        assert!(outcome.backup.is_none());
        assert!(!dir.path().join("a.css.backup").exists());
    }

    #[test]
    fn test_dry_run_leaves_disk_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.css");
        fs::write(&file, "abc").unwrap();
        let config = FixConfig::default().with_dry_run(true);

        let outcome = rewrite_file(&file, &Shout, &config).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.remaining, 3);
        assert_eq!(fs::read_to_string(&file).unwrap(), "abc");
        assert!(!dir.path().join("a.css.backup").exists());
    }

    #[test]
    fn test_invalid_utf8_is_an_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.css");
        fs::write(&file, [0xff, 0xfe, 0x00]).unwrap();

        let err = rewrite_file(&file, &Shout, &FixConfig::default()).unwrap_err();
        assert!(matches!(err, FixError::Encoding { .. }));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = FixConfig {
            root: dir.path().join("missing"),
            ..FixConfig::default()
        };
        assert!(matches!(run_pass(&Shout, &config), Err(FixError::Root(_))));
    }
}
