//! # deriving
//!
//! Runs code generators for declarations annotated with `[deriving(...)]`.
//!
//! ## Usage
//!
//! ```bash
//! # Run the Unique generator (a cargo package) for the current directory
//! deriving Unique=../traits/unique
//!
//! # Scan another package directory with an explicit package name
//! deriving --dir src/models --package models Unique=deriving-unique
//!
//! # Show the generator commands without running them
//! deriving --dry-run Unique=../traits/unique
//! ```

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use deriving_cli::{
    config::{CliArgs, ConfigManager, GeneratorSpec},
    dispatcher::{Dispatcher, Outcome},
    error::CliError,
    groups::TraitGroups,
    parser::RustParser,
    scanner::SourceScanner,
};

#[derive(Parser)]
#[command(name = "deriving")]
#[command(author, version, about = "Run code generators for [deriving(...)] annotations", long_about = None)]
struct Cli {
    /// Generators to run, as Trait=path/to/generator
    #[arg(value_name = "TRAIT=PATH")]
    generators: Vec<GeneratorSpec>,

    /// Package directory containing Rust source files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Package name passed to generators (defaults to the directory name)
    #[arg(short, long)]
    package: Option<String>,

    /// Source files to scan instead of listing the package directory
    #[arg(long = "file", value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Only scan files matching a glob pattern
    #[arg(long)]
    filter: Option<String>,

    /// Configuration file path (defaults to <DIR>/deriving.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print generator commands without running them
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    deriving::runtime::init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Load configuration
    let config = ConfigManager::load(cli.config.as_deref(), &cli.dir)?;
    let config = ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            package: cli.package,
            generators: cli.generators,
        },
    );
    let generators = config.generator_config()?;
    let package = config.package_name(&cli.dir);

    println!("{}", "Scanning for Rust source files...".cyan());

    let mut scanner = SourceScanner::new(&cli.dir);
    if !cli.files.is_empty() {
        scanner = scanner.with_files(cli.files);
    }
    if let Some(pattern) = cli.filter.as_deref() {
        scanner = scanner.with_filter(pattern)?;
    }
    let files = scanner.scan()?;

    if files.is_empty() {
        println!("{}", "No Rust files found.".yellow());
        return Ok(());
    }

    println!("  Found {} Rust file(s)", files.len().to_string().green());

    // Every file must parse before anything is generated
    let declarations = RustParser::new().parse_files(&files)?;
    let groups = TraitGroups::build(&declarations);

    if groups.is_empty() {
        println!("{}", "No [deriving(...)] annotations found.".yellow());
        return Ok(());
    }

    println!(
        "  Found {} annotated declaration(s) requesting {} trait(s)",
        groups.annotated().to_string().green(),
        groups.len().to_string().green()
    );

    let dispatcher = Dispatcher::new(&generators, &cli.dir, package).with_dry_run(cli.dry_run);
    if dispatcher.is_dry_run() {
        println!("{}", "Dry run: generators will not be started.".yellow());
    }

    // Resolution of every generator happens before the first one starts
    let report = dispatcher.run(&groups, |invocation| println!("{}", invocation))?;

    for entry in &report.traits {
        match &entry.outcome {
            Outcome::Succeeded { .. } => {
                println!("{} {}", "✓".green(), entry.trait_name);
            }
            Outcome::Failed { status, output } => {
                let status = status.map_or_else(|| "none".to_string(), |code| code.to_string());
                println!(
                    "{} {} generator failed (exit status {})",
                    "Warning:".yellow(),
                    entry.trait_name,
                    status
                );
                print!("{}", output);
            }
            Outcome::NotRun => {
                println!("{} {}", "[dry-run]".yellow(), entry.trait_name);
            }
            Outcome::Skipped => {
                println!(
                    "  {} no generator configured for {}",
                    "Skipping:".dimmed(),
                    entry.trait_name.bold()
                );
            }
        }
    }

    if report.has_failures() {
        println!(
            "{} {} of {} generator(s) failed",
            "Warning:".yellow(),
            report.failed().count(),
            report.invoked()
        );
    }

    Ok(())
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
