//! Process entry point shared by generator programs.

use std::process::ExitCode;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::args::GeneratorArgs;
use crate::emit::Generator;
use crate::error::DeriveResult;
use crate::targets::Targets;
use crate::writer::{OutputWriter, WriteResult};

/// Install a stderr tracing subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run a generator as the body of `main`.
///
/// Loads targets from the process arguments, renders them, and writes the
/// generator's output file. With `--dry-run` the formatted file goes to
/// stdout instead. Any error is printed and turned into a failing exit
/// status; nothing is written in that case.
///
/// ```rust,ignore
/// fn main() -> ExitCode {
///     deriving::run(UniqueGenerator)
/// }
/// ```
pub fn run<G: Generator>(generator: G) -> ExitCode {
    init_tracing();

    match generate(&generator) {
        Ok(WriteResult::Written { path, bytes }) => {
            tracing::info!(
                trait_name = generator.trait_name(),
                path = %path.display(),
                bytes,
                "Generated"
            );
            ExitCode::SUCCESS
        }
        Ok(WriteResult::DryRun { content, .. }) => {
            print!("{content}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}: {}", "Error:".red().bold(), generator.trait_name(), e);
            ExitCode::FAILURE
        }
    }
}

fn generate<G: Generator>(generator: &G) -> DeriveResult<WriteResult> {
    let args = GeneratorArgs::from_env()?;
    let writer = OutputWriter::new(args.dry_run);
    let targets = Targets::from_args(args)?;

    for name in targets.unmatched() {
        tracing::warn!(
            trait_name = generator.trait_name(),
            name,
            "No declaration found for requested name"
        );
    }

    targets.generate(generator, &writer)
}
