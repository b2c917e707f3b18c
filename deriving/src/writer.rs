//! File writer for generated code.
//!
//! Output is formatted before anything touches disk and then swapped into
//! place with a rename, so a destination file is either the previous
//! content or a complete, syntactically valid replacement.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{DeriveError, DeriveResult};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Formatted content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// Writer that formats Rust source and replaces files atomically.
#[derive(Debug, Default)]
pub struct OutputWriter {
    dry_run: bool,
}

impl OutputWriter {
    /// Create a new writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Format `content` and replace `path` with it.
    ///
    /// In dry-run mode, returns the formatted content without writing.
    pub fn write(&self, path: &Path, content: &str) -> DeriveResult<WriteResult> {
        let formatted = format_source(path, content)?;

        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: formatted,
                path: path.to_path_buf(),
            });
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| write_error(dir, e))?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
        temp.write_all(formatted.as_bytes())
            .map_err(|e| write_error(path, e))?;
        temp.persist(path).map_err(|e| write_error(path, e.error))?;

        tracing::debug!(path = %path.display(), bytes = formatted.len(), "Wrote generated file");

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: formatted.len(),
        })
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }
}

/// Parse and pretty-print generated source.
pub fn format_source(path: &Path, content: &str) -> DeriveResult<String> {
    let syntax = syn::parse_file(content).map_err(|e| {
        let start = e.span().start();
        DeriveError::Format {
            path: path.to_path_buf(),
            message: format!("{}:{}: {}", start.line, start.column + 1, e),
        }
    })?;
    Ok(prettyplease::unparse(&syntax))
}

fn write_error(path: &Path, source: std::io::Error) -> DeriveError {
    DeriveError::Write {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_formats_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gen.rs");

        let writer = OutputWriter::new(false);
        let result = writer.write(&path, "fn  answer()->u8{42}").unwrap();

        assert!(matches!(result, WriteResult::Written { bytes: 29, .. }));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "fn answer() -> u8 {\n    42\n}\n"
        );
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gen.rs");
        fs::write(&path, "fn stale() {}\n").unwrap();

        OutputWriter::new(false)
            .write(&path, "fn fresh() {}")
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fn fresh() {}\n");
    }

    #[test]
    fn test_invalid_code_leaves_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gen.rs");
        fs::write(&path, "fn previous() {}\n").unwrap();

        let result = OutputWriter::new(false).write(&path, "impl Broken {");

        assert!(matches!(result, Err(DeriveError::Format { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "fn previous() {}\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_invalid_code_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gen.rs");

        let result = OutputWriter::new(false).write(&path, "struct {");

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gen.rs");

        let result = OutputWriter::new(true).write(&path, "struct  A;").unwrap();

        assert!(!path.exists());
        match result {
            WriteResult::DryRun { content, .. } => assert_eq!(content, "struct A;\n"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/gen.rs");

        OutputWriter::new(false).write(&path, "struct A;").unwrap();

        assert!(path.exists());
    }
}
