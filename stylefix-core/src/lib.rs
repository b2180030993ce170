//! Stylefix Core - rewrite passes for design-system compliance
//!
//! This library holds the batch transformations used to bring an application
//! source tree in line with the design-system conventions. Each pass is a
//! standalone read / transform / conditionally-write sweep over the tree.
//!
//! # Architecture
//!
//! Every pass implements the [`Rewrite`] trait and is driven by
//! [`rewrite::run_pass`], which owns traversal, backups and per-file failure
//! capture:
//!
//! - **Units**: converts `px` literals to `rem` values or spacing tokens
//! - **Selectors**: drops legacy `.dark` selector lines that duplicate a
//!   `[data-theme="dark"]` selector, keeping a `.backup` copy
//! - **Class names**: migrates utility `className` strings to CSS-module
//!   references through an ordered list of substitutions
//!
//! # Example
//!
//! ```rust
//! use stylefix_core::units::{convert, PxRewrite};
//! use stylefix_core::Rewrite;
//!
//! assert_eq!(convert(24), "1.5rem");
//! let out = PxRewrite.apply("margin: 16px;");
//! assert_eq!(out.text, "margin: 1rem;");
//! ```

#![forbid(unsafe_code)]
// Lints configured in Cargo.toml

pub use std::path::{Path, PathBuf};

pub use anyhow::{Context, Result};

// Core modules
pub mod classnames;
pub mod config;
pub mod error;
pub mod report;
pub mod rewrite;
pub mod selectors;
pub mod units;
pub mod walk;

// Public API
pub use config::{FixConfig, Pass};
pub use error::{FixError, FixResult};
pub use report::{FileOutcome, RunReport};
pub use rewrite::{run_pass, Rewrite, Rewritten};

/// Tool version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Detect the application source root
///
/// Walks up from the current directory to the nearest `package.json` and
/// returns its `src/` directory when present, otherwise the package root.
pub fn detect_source_root() -> Result<PathBuf> {
    let current = std::env::current_dir().context("Failed to get current directory")?;
    detect_source_root_from(&current)
}

/// Detect the application source root starting at `start`
pub fn detect_source_root_from(start: &Path) -> Result<PathBuf> {
    let mut path = start;
    loop {
        if path.join("package.json").is_file() {
            let src = path.join("src");
            return Ok(if src.is_dir() { src } else { path.to_path_buf() });
        }

        match path.parent() {
            Some(parent) => path = parent,
            None => break,
        }
    }

    anyhow::bail!(
        "Could not find an application root (package.json) above {}",
        start.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_root_prefers_src() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        std::fs::create_dir_all(dir.path().join("src/components")).unwrap();

        let nested = dir.path().join("src/components");
        let root = detect_source_root_from(&nested).unwrap();
        assert_eq!(root, dir.path().join("src"));
    }

    #[test]
    fn test_source_root_without_src_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();

        let root = detect_source_root_from(dir.path()).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_version_defined() {
        assert!(!VERSION.is_empty(), "Version should be defined");
    }
}
