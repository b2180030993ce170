//! Source tree traversal

use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use walkdir::{
    DirEntry,
    WalkDir,
};

use crate::{
    config::FixConfig,
    error::{
        FixError,
        FixResult,
    },
};

/// Depth-first walker over the files a pass should visit
pub struct SourceWalker<'a> {
    config: &'a FixConfig,
}

impl<'a> SourceWalker<'a> {
    /// Create a walker for `config`
    pub fn new(config: &'a FixConfig) -> Self {
        Self { config }
    }

    /// Iterate candidate files below the root, sorted by name per directory
    ///
    /// Fails only when the root itself cannot be enumerated. Errors on
    /// entries further down are yielded so the caller can record and skip
    /// them.
    pub fn files(
        &self,
    ) -> FixResult<impl Iterator<Item = Result<PathBuf, walkdir::Error>> + use<'a>> {
        let config = self.config;
        let root = &config.root;
        if !root.is_dir() {
            return Err(FixError::Root(root.clone()));
        }
        fs::read_dir(root).map_err(|e| FixError::io(root, e))?;

        let iter = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| entry.depth() == 0 || !is_excluded_dir(config, entry))
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() && is_candidate(config, entry.path()) => {
                    Some(Ok(entry.into_path()))
                },
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            });
        Ok(iter)
    }

    /// Collect candidate files, dropping unreadable entries
    pub fn collect(&self) -> FixResult<Vec<PathBuf>> {
        Ok(self.files()?.filter_map(Result::ok).collect())
    }
}

fn is_excluded_dir(config: &FixConfig, entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    name.starts_with('.') || config.excluded_dirs.iter().any(|d| d == name)
}

/// Whether `path` has a visited extension and is not an excluded file
pub fn is_candidate(config: &FixConfig, path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with(&config.backup_suffix) || config.excluded_files.iter().any(|f| f == name) {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| config.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
