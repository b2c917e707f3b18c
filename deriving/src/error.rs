//! Error types for generator programs.
//!
//! Every failure inside a generator process is fatal: the process prints the
//! error and exits non-zero, and the orchestrator only ever sees that exit
//! status and the captured output.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for toolkit operations.
pub type DeriveResult<T> = Result<T, DeriveError>;

/// Main error type for generator programs.
#[derive(Debug, Error)]
pub enum DeriveError {
    /// The invocation arguments were missing or malformed.
    #[error("Invalid generator arguments: {0}")]
    Args(String),

    /// An assigned source file failed to parse.
    #[error("Can't parse file {file}:{line}:{column}: {message}")]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// An assigned source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A target does not have the shape the trait requires.
    #[error("{name}: {message}")]
    Shape { name: String, message: String },

    /// A code template failed to parse or render.
    #[error("Can't render code template: {0}")]
    Template(#[from] tera::Error),

    /// The generated code is not valid Rust.
    #[error("Can't format generated code for {path}: {message}")]
    Format { path: PathBuf, message: String },

    /// The output file could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DeriveError {
    /// Create a parse error from a `syn` error, using its span for location.
    pub fn parse(file: impl Into<PathBuf>, error: &syn::Error) -> Self {
        let start = error.span().start();
        Self::Parse {
            file: file.into(),
            line: start.line,
            column: start.column + 1,
            message: error.to_string(),
        }
    }

    /// Create a shape-mismatch error for the named target.
    pub fn shape(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Shape {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Fail with a shape-mismatch error unless `ok` holds.
///
/// ```
/// use deriving::error::ensure;
///
/// assert!(ensure(true, "Integers", "unreachable").is_ok());
/// assert!(ensure(false, "Integers", "not a collection").is_err());
/// ```
pub fn ensure(ok: bool, name: &str, message: impl Into<String>) -> DeriveResult<()> {
    if ok {
        Ok(())
    } else {
        Err(DeriveError::shape(name, message))
    }
}
