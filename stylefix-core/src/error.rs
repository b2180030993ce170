//! Error types for the rewrite passes

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while scanning or rewriting the source tree
#[derive(Debug, Error)]
pub enum FixError {
    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation was performed on
        path:   PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid UTF-8 text
    #[error("{} is not valid UTF-8 text", path.display())]
    Encoding {
        /// Offending file
        path: PathBuf,
    },

    /// Directory traversal failed
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A rule pattern failed to compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The source root does not exist or is not a directory
    #[error("source root {} is not a directory", .0.display())]
    Root(PathBuf),
}

impl FixError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FixError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the library
pub type FixResult<T> = Result<T, FixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = FixError::io(
            "src/app.css",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("src/app.css"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_encoding_error_message() {
        let err = FixError::Encoding {
            path: PathBuf::from("a.css"),
        };
        assert_eq!(err.to_string(), "a.css is not valid UTF-8 text");
    }
}
