//! Loading the declarations a generator was asked to act on.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::args::GeneratorArgs;
use crate::decl::{collect_declarations, Declaration};
use crate::error::{DeriveError, DeriveResult};

/// The declarations assigned to one generator invocation.
#[derive(Debug, Clone)]
pub struct Targets {
    /// Package the generated code belongs to.
    pub pkg: String,

    /// Files that were re-parsed.
    pub files: Vec<PathBuf>,

    /// Identifiers requested by the orchestrator.
    pub names: Vec<String>,

    /// Matched declarations, in file order then source order.
    pub nodes: Vec<Declaration>,
}

impl Targets {
    /// Load targets described by already-parsed arguments.
    pub fn from_args(args: GeneratorArgs) -> DeriveResult<Self> {
        let wanted: HashSet<String> = args.names.iter().cloned().collect();

        let mut nodes = Vec::new();
        for path in &args.files {
            nodes.extend(load_file(path, &wanted)?);
        }

        tracing::debug!(
            pkg = %args.pkg,
            files = args.files.len(),
            requested = args.names.len(),
            matched = nodes.len(),
            "Loaded targets"
        );

        Ok(Self {
            pkg: args.pkg,
            files: args.files,
            names: args.names,
            nodes,
        })
    }

    /// Check whether a name was requested.
    pub fn include(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Requested names that matched no declaration in any listed file.
    pub fn unmatched(&self) -> Vec<&str> {
        self.names
            .iter()
            .filter(|name| !self.nodes.iter().any(|node| &node.name == *name))
            .map(String::as_str)
            .collect()
    }
}

fn load_file(path: &Path, wanted: &HashSet<String>) -> DeriveResult<Vec<Declaration>> {
    let content = std::fs::read_to_string(path).map_err(|e| DeriveError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let syntax = syn::parse_file(&content).map_err(|e| DeriveError::parse(path, &e))?;
    Ok(collect_declarations(&syntax, path, Some(wanted)))
}
