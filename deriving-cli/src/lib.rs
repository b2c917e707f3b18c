//! # deriving-cli
//!
//! Orchestrator for annotation-driven code generation.
//!
//! Declarations whose doc comment contains `[deriving(Trait, ...)]` are
//! grouped by trait, and every group is handed to the generator program
//! configured for that trait as a separate process.
//!
//! ## Architecture
//!
//! - [`config`] - `Trait=path` arguments and `deriving.toml`
//! - [`scanner`] - Source file discovery for a package directory
//! - [`parser`] - Rust source parsing into declarations
//! - [`annotation`] - `[deriving(...)]` annotation parsing
//! - [`groups`] - Grouping declarations by trait
//! - [`dispatcher`] - Resolving and running generator programs
//! - [`error`] - Error types and handling

pub mod annotation;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod groups;
pub mod parser;
pub mod scanner;

// Re-export main types for convenience
pub use annotation::Annotation;
pub use config::{Config, ConfigManager, GeneratorConfig, GeneratorSpec};
pub use dispatcher::{DispatchReport, Dispatcher, Invocation, Outcome, Program};
pub use error::{CliError, CliResult};
pub use groups::{TraitGroup, TraitGroups};
pub use parser::RustParser;
pub use scanner::{SourceFile, SourceScanner};
