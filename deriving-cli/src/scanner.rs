//! Source file scanner for a package directory.
//!
//! A package is a single directory: its `.rs` files are listed without
//! descending into subdirectories, `.gitignore` patterns are respected
//! whether or not the directory is inside a git repository, and results are
//! sorted by path so every run sees the same order.
//!
//! File names travel to generators as a comma-joined list, so a file whose
//! package-relative path contains a comma is rejected.

use crate::error::{CliResult, ScanError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A discovered source file with its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file, usable from the current directory.
    pub path: PathBuf,

    /// Path relative to the package directory; this is what generators see.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for discovering a package's Rust source files.
#[derive(Debug)]
pub struct SourceScanner {
    /// Package directory.
    root: PathBuf,

    /// Explicit files, replacing directory discovery when set.
    files: Option<Vec<PathBuf>>,

    /// Optional glob filter pattern.
    filter: Option<glob::Pattern>,
}

impl SourceScanner {
    /// Create a new scanner for the given package directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: None,
            filter: None,
        }
    }

    /// Use an explicit file list instead of listing the directory.
    ///
    /// Relative paths are taken relative to the package directory.
    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = Some(files);
        self
    }

    /// Set a glob filter pattern for files.
    ///
    /// Only files whose package-relative path matches the pattern are kept.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Scan the package and return its Rust files, sorted by path.
    pub fn scan(&self) -> CliResult<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let mut paths: Vec<PathBuf> = match self.files {
            Some(ref files) => files.iter().map(|f| self.root.join(f)).collect(),
            None => self.list_directory()?,
        };
        paths.sort();
        paths.dedup();

        let mut files = Vec::new();
        for path in paths {
            let relative_path = self.relative_path(&path);

            if let Some(ref pattern) = self.filter {
                if !pattern.matches_path(&relative_path) {
                    continue;
                }
            }
            if relative_path.to_string_lossy().contains(',') {
                return Err(ScanError::UnsupportedPath { path: relative_path }.into());
            }

            let content = std::fs::read_to_string(&path).map_err(|e| ScanError::Io {
                path: path.clone(),
                source: e,
            })?;

            files.push(SourceFile {
                path,
                relative_path,
                content,
            });
        }

        tracing::debug!(root = %self.root.display(), files = files.len(), "Scanned package");

        Ok(files)
    }

    fn list_directory(&self) -> CliResult<Vec<PathBuf>> {
        let walker = WalkBuilder::new(&self.root)
            .max_depth(Some(1))
            .require_git(false)
            .hidden(true)
            .build();

        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() || path.extension().map_or(true, |ext| ext != "rs") {
                continue;
            }
            paths.push(path.to_path_buf());
        }
        Ok(paths)
    }

    /// Get the relative path from root.
    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("slices.rs"), "pub struct A;").unwrap();
        fs::write(dir.path().join("lib.rs"), "pub mod slices;").unwrap();

        // Subdirectories belong to other packages
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/inner.rs"), "pub fn inner() {}").unwrap();

        fs::write(dir.path().join("README.md"), "# Test").unwrap();

        dir
    }

    fn names(files: &[SourceFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.relative_path.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_lists_package_files_sorted() {
        let dir = create_test_dir();
        let files = SourceScanner::new(dir.path()).scan().unwrap();

        assert_eq!(names(&files), ["lib.rs", "slices.rs"]);
    }

    #[test]
    fn test_scan_reads_content() {
        let dir = create_test_dir();
        let files = SourceScanner::new(dir.path()).scan().unwrap();

        assert_eq!(files[1].content, "pub struct A;");
    }

    #[test]
    fn test_scan_with_filter() {
        let dir = create_test_dir();
        let files = SourceScanner::new(dir.path())
            .with_filter("sl*.rs")
            .unwrap()
            .scan()
            .unwrap();

        assert_eq!(names(&files), ["slices.rs"]);
    }

    #[test]
    fn test_invalid_filter() {
        let result = SourceScanner::new(".").with_filter("[");
        assert!(matches!(result, Err(ScanError::InvalidPattern { .. })));
    }

    #[test]
    fn test_scan_explicit_files() {
        let dir = create_test_dir();
        let files = SourceScanner::new(dir.path())
            .with_files(vec![PathBuf::from("slices.rs"), PathBuf::from("nested/inner.rs")])
            .scan()
            .unwrap();

        assert_eq!(names(&files), ["nested/inner.rs", "slices.rs"]);
    }

    #[test]
    fn test_scan_missing_explicit_file() {
        let dir = create_test_dir();
        let result = SourceScanner::new(dir.path())
            .with_files(vec![PathBuf::from("missing.rs")])
            .scan();

        assert!(matches!(
            result,
            Err(crate::error::CliError::Scan(ScanError::Io { .. }))
        ));
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let result = SourceScanner::new("/nonexistent/path").scan();

        assert!(matches!(
            result,
            Err(crate::error::CliError::Scan(ScanError::DirectoryNotFound { .. }))
        ));
    }

    #[test]
    fn test_scan_respects_gitignore_outside_git() {
        let dir = create_test_dir();
        fs::write(dir.path().join(".gitignore"), "generated_*.rs\n").unwrap();
        fs::write(dir.path().join("generated_unique.rs"), "pub struct G;").unwrap();

        let files = SourceScanner::new(dir.path()).scan().unwrap();

        assert_eq!(names(&files), ["lib.rs", "slices.rs"]);
    }

    #[test]
    fn test_scan_rejects_comma_in_file_name() {
        let dir = create_test_dir();
        fs::write(dir.path().join("a,b.rs"), "pub struct A;").unwrap();

        let result = SourceScanner::new(dir.path()).scan();

        assert!(matches!(
            result,
            Err(crate::error::CliError::Scan(ScanError::UnsupportedPath { .. }))
        ));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();
        let files = SourceScanner::new(dir.path()).scan().unwrap();

        assert!(files.is_empty());
    }
}
