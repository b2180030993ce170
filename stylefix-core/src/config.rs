//! Configuration for a rewrite run

use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};

/// Directory names that are never descended into
pub const DEFAULT_EXCLUDED_DIRS: &[&str] =
    &["node_modules", ".next", ".git", "dist", "build", "coverage"];

/// File names holding design-token definitions, never rewritten
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &["tokens.css", "globals.css", "design-tokens.css"];

/// Suffix appended to a path for the selector pass safety copy
pub const BACKUP_SUFFIX: &str = ".backup";

/// The rewrite passes available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pass {
    /// px literals to rem / spacing tokens
    Units,
    /// Legacy `.dark` selector cleanup
    Selectors,
    /// Utility className migration
    Classes,
}

impl Pass {
    /// All passes, in the order `check` runs them
    pub const ALL: [Pass; 3] = [Pass::Units, Pass::Selectors, Pass::Classes];

    /// File extensions the pass visits by default
    pub fn default_extensions(self) -> &'static [&'static str] {
        match self {
            Pass::Units | Pass::Selectors => &["css", "scss"],
            Pass::Classes => &["tsx", "jsx"],
        }
    }
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pass::Units => write!(f, "units"),
            Pass::Selectors => write!(f, "selectors"),
            Pass::Classes => write!(f, "classes"),
        }
    }
}

/// Settings for a single pass over the source tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixConfig {
    /// Root directory to scan
    pub root:           PathBuf,
    /// File extensions to visit (without the dot)
    pub extensions:     Vec<String>,
    /// Directory names to prune
    pub excluded_dirs:  Vec<String>,
    /// File names to skip
    pub excluded_files: Vec<String>,
    /// Report changes without writing anything
    pub dry_run:        bool,
    /// Emit per-file detail
    pub verbose:        bool,
    /// Suffix for backup copies
    pub backup_suffix:  String,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            root:           PathBuf::from("src"),
            extensions:     vec!["css".to_string()],
            excluded_dirs:  DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            excluded_files: DEFAULT_EXCLUDED_FILES.iter().map(|s| s.to_string()).collect(),
            dry_run:        false,
            verbose:        false,
            backup_suffix:  BACKUP_SUFFIX.to_string(),
        }
    }
}

impl FixConfig {
    /// Default configuration for `pass` rooted at `root`
    pub fn for_pass(pass: Pass, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: pass.default_extensions().iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Replace the extension list
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Add names to both exclusion lists
    pub fn with_extra_excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            self.excluded_dirs.push(name.clone());
            self.excluded_files.push(name);
        }
        self
    }

    /// Toggle dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sibling backup path for `path`
    pub fn backup_path(&self, path: &std::path::Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(&self.backup_suffix);
        PathBuf::from(name)
    }
}
