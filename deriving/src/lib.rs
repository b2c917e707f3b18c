//! # deriving
//!
//! Toolkit for generator programs invoked by the `deriving` orchestrator.
//!
//! The orchestrator finds declarations annotated with `[deriving(Trait)]`
//! in their doc comments and runs one generator program per trait. Each
//! generator uses this crate to:
//!
//! - read its invocation contract ([`args`])
//! - re-parse the listed files and keep the requested declarations ([`targets`], [`decl`])
//! - render one fragment per declaration ([`template`], [`emit`])
//! - format and replace its output file ([`writer`])
//!
//! ```rust,ignore
//! use deriving::{Declaration, DeriveResult, Generator};
//!
//! struct Unique;
//!
//! impl Generator for Unique {
//!     fn trait_name(&self) -> &'static str { "Unique" }
//!     fn output_file(&self) -> &'static str { "unique_gen.rs" }
//!     fn render(&self, out: &mut String, target: &Declaration) -> DeriveResult<()> {
//!         // ...
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     deriving::run(Unique)
//! }
//! ```

pub mod args;
pub mod decl;
pub mod emit;
pub mod error;
pub mod runtime;
pub mod targets;
pub mod template;
pub mod writer;

// Re-export main types for convenience
pub use args::GeneratorArgs;
pub use decl::{collect_declarations, DeclNode, Declaration, SourceLocation, TypeDef};
pub use emit::{package_header, Generator};
pub use error::{ensure, DeriveError, DeriveResult};
pub use runtime::run;
pub use targets::Targets;
pub use template::{render_template, type_to_string};
pub use writer::{OutputWriter, WriteResult};
