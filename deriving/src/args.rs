//! The command-line contract between the orchestrator and a generator.
//!
//! A generator is invoked as
//!
//! ```text
//! <generator> -pkg <package> -files <a.rs,b.rs> -names <TypeA,TypeB>
//! ```
//!
//! The single-dash flag spelling is what the orchestrator emits; the
//! double-dash spelling is accepted too so generators can be run by hand.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use clap::Parser;

use crate::error::{DeriveError, DeriveResult};

/// Flags that make up the invocation contract.
const CONTRACT_FLAGS: [&str; 3] = ["pkg", "files", "names"];

/// Arguments every generator program receives.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(about = "Generate derived code for the listed declarations", long_about = None)]
pub struct GeneratorArgs {
    /// The package to generate code for
    #[arg(long = "pkg", value_name = "PACKAGE")]
    pub pkg: String,

    /// A comma-separated list of filenames
    #[arg(long, value_name = "FILES", value_delimiter = ',', required = true)]
    pub files: Vec<PathBuf>,

    /// A comma-separated list of identifiers
    #[arg(long, value_name = "NAMES", value_delimiter = ',', required = true)]
    pub names: Vec<String>,

    /// Print the generated file instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl GeneratorArgs {
    /// Build the arguments for a trait group.
    pub fn new(
        pkg: impl Into<String>,
        files: impl IntoIterator<Item = PathBuf>,
        names: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            pkg: pkg.into(),
            files: files.into_iter().collect(),
            names: names.into_iter().collect(),
            dry_run: false,
        }
    }

    /// Parse the current process's arguments.
    ///
    /// Usage errors print clap's message and exit, like any clap binary.
    pub fn from_env() -> DeriveResult<Self> {
        let args = Self::parse_from(normalize_flags(std::env::args_os()));
        args.validate()
    }

    /// Parse arguments from an iterator, the first item being the program name.
    pub fn try_from_iter<I, T>(args: I) -> DeriveResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args = Self::try_parse_from(normalize_flags(args))
            .map_err(|e| DeriveError::Args(e.to_string()))?;
        args.validate()
    }

    /// Render the arguments in the form the orchestrator passes them.
    ///
    /// Lists are joined with `,` as-is, so a file name must not contain a
    /// comma; the orchestrator's scanner rejects such files.
    pub fn to_command_args(&self) -> Vec<String> {
        let files: Vec<String> = self
            .files
            .iter()
            .map(|f| f.to_string_lossy().into_owned())
            .collect();

        vec![
            "-pkg".to_string(),
            self.pkg.clone(),
            "-files".to_string(),
            files.join(","),
            "-names".to_string(),
            self.names.join(","),
        ]
    }

    /// Drop empty list entries and reject empty contract values.
    fn validate(mut self) -> DeriveResult<Self> {
        self.files.retain(|f| !f.as_os_str().is_empty());
        self.names.retain(|n| !n.trim().is_empty());
        for name in &mut self.names {
            *name = name.trim().to_string();
        }

        if self.pkg.trim().is_empty() {
            return Err(DeriveError::Args("-pkg must not be empty".to_string()));
        }
        if self.files.is_empty() {
            return Err(DeriveError::Args("-files must list at least one file".to_string()));
        }
        if self.names.is_empty() {
            return Err(DeriveError::Args("-names must list at least one identifier".to_string()));
        }

        Ok(self)
    }
}

/// Rewrite `-pkg`, `-files` and `-names` to their double-dash form.
fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| normalize_flag(&arg).unwrap_or(arg))
        .collect()
}

fn normalize_flag(arg: &OsStr) -> Option<OsString> {
    let text = arg.to_str()?;
    let rest = text.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let flag = rest.split('=').next()?;
    CONTRACT_FLAGS
        .contains(&flag)
        .then(|| OsString::from(format!("-{text}")))
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Only the three contract flags are rewritten; values and any other
        /// argument pass through unchanged.
        #[test]
        fn prop_normalize_only_touches_contract_flags(
            args in proptest::collection::vec("-{0,2}[a-z.,=]{0,8}", 0..8),
        ) {
            let normalized = normalize_flags(args.clone());

            prop_assert_eq!(normalized.len(), args.len());
            for (before, after) in args.iter().zip(&normalized) {
                let flag = before
                    .strip_prefix('-')
                    .filter(|rest| !rest.starts_with('-'))
                    .and_then(|rest| rest.split('=').next())
                    .filter(|flag| CONTRACT_FLAGS.contains(flag));

                match flag {
                    Some(_) => prop_assert_eq!(after, &OsString::from(format!("-{before}"))),
                    None => prop_assert_eq!(after, &OsString::from(before)),
                }
            }
        }
    }
}
