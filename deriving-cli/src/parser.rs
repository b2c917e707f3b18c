//! Rust source parser for extracting declarations.
//!
//! Every file of the package must parse; a single syntax error fails the
//! whole run, since generating from a partial package would silently drop
//! annotated declarations.

use crate::error::{CliResult, ParseError};
use crate::scanner::SourceFile;
use deriving::{collect_declarations, Declaration};
use std::path::Path;

/// Parser for a package's source files.
#[derive(Debug, Default)]
pub struct RustParser;

impl RustParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a source file and return its declarations.
    ///
    /// Declarations record the file's package-relative path.
    pub fn parse_file(&self, source: &SourceFile) -> CliResult<Vec<Declaration>> {
        self.parse_source(&source.content, &source.relative_path)
    }

    /// Parse source code and return every declaration in source order.
    pub fn parse_source(&self, content: &str, file_path: &Path) -> CliResult<Vec<Declaration>> {
        let syntax = syn::parse_file(content).map_err(|e| {
            let start = e.span().start();
            ParseError::syntax(file_path.to_path_buf(), start.line, start.column + 1, e.to_string())
        })?;

        Ok(collect_declarations(&syntax, file_path, None))
    }

    /// Parse all files, in order, stopping at the first error.
    pub fn parse_files(&self, sources: &[SourceFile]) -> CliResult<Vec<Declaration>> {
        let mut declarations = Vec::new();
        for source in sources {
            declarations.extend(self.parse_file(source)?);
        }
        Ok(declarations)
    }
}
