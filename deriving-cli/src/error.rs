//! Error types for the orchestrator.
//!
//! Every error here is fatal for the whole run. A generator that exits
//! non-zero is not an error at this level; it is reported as a failed
//! outcome and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during source file scanning.
    #[error("Failed to scan package: {0}")]
    Scan(#[from] ScanError),

    /// Error during Rust source parsing.
    #[error("Can't parse package: {0}")]
    Parse(#[from] ParseError),

    /// Error loading configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error resolving a generator.
    #[error("{0}")]
    Dispatch(#[from] DispatchError),
}

/// Error during source file scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Invalid filter pattern.
    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error during scanning.
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file name that cannot be passed in a comma-separated list.
    #[error("File name contains ',' and can't be passed to generators: {path}")]
    UnsupportedPath { path: PathBuf },

    /// Error from ignore crate walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error during Rust source parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Syntax error in Rust source.
    #[error("{file}:{line}:{column}: {message}")]
    Syntax {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
}

/// Error loading configuration or generator arguments.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A `Trait=path` argument is malformed.
    #[error(r#"arguments must use the format "{{Name}}={{path/to/generator}}" (unexpected "{argument}")"#)]
    InvalidGenerator { argument: String },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error resolving a generator program.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The configured program could not be found.
    #[error("{trait_name}: can't resolve generator '{program}'")]
    Unresolved { trait_name: String, program: String },

    /// The program is a file without execute permission.
    #[error("{trait_name}: generator '{program}' is not executable")]
    NotExecutable { trait_name: String, program: String },
}

impl ParseError {
    /// Create a syntax error with location information.
    pub fn syntax(file: PathBuf, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            file,
            line,
            column,
            message: message.into(),
        }
    }
}

impl ScanError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Create an invalid generator argument error.
    pub fn invalid_generator(argument: impl Into<String>) -> Self {
        Self::InvalidGenerator {
            argument: argument.into(),
        }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
