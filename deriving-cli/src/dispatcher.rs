//! Running generator programs for trait groups.
//!
//! Each generator is a separate process. A generator that fails, or cannot
//! be started, is reported and the remaining traits still run. Only a
//! generator that cannot be resolved stops the run, and that is checked for
//! every trait before anything is executed.

use crate::config::GeneratorConfig;
use crate::error::{CliResult, DispatchError};
use crate::groups::TraitGroups;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A resolved generator program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// A cargo package, run with `cargo run`.
    Cargo { manifest: PathBuf },
    /// An executable file.
    Executable(PathBuf),
}

impl Program {
    /// Resolve a configured program for a trait.
    ///
    /// Paths are relative to the package directory. A directory must contain
    /// a `Cargo.toml`, a file must be executable, and a bare name is looked
    /// up on `PATH`.
    pub fn resolve(
        trait_name: &str,
        program: &str,
        package_dir: &Path,
    ) -> Result<Self, DispatchError> {
        let unresolved = || DispatchError::Unresolved {
            trait_name: trait_name.to_string(),
            program: program.to_string(),
        };

        let path = package_dir.join(program);
        if path.is_dir() {
            let manifest = path.join("Cargo.toml");
            if !manifest.is_file() {
                return Err(unresolved());
            }
            let manifest = manifest.canonicalize().map_err(|_| unresolved())?;
            return Ok(Self::Cargo { manifest });
        }
        if path.is_file() {
            if !is_executable(&path) {
                return Err(DispatchError::NotExecutable {
                    trait_name: trait_name.to_string(),
                    program: program.to_string(),
                });
            }
            return path.canonicalize().map(Self::Executable).map_err(|_| unresolved());
        }
        if !program.contains(|c: char| c == '/' || c == '\\') {
            return which::which(program)
                .map(Self::Executable)
                .map_err(|_| unresolved());
        }

        Err(unresolved())
    }

    /// The program and leading arguments to run it with.
    fn base_command(&self) -> (PathBuf, Vec<String>) {
        match self {
            Self::Cargo { manifest } => {
                let cargo = std::env::var_os("CARGO")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("cargo"));
                let args = vec![
                    "run".to_string(),
                    "--quiet".to_string(),
                    "--manifest-path".to_string(),
                    manifest.to_string_lossy().into_owned(),
                    "--".to_string(),
                ];
                (cargo, args)
            }
            Self::Executable(path) => (path.clone(), Vec::new()),
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

/// One planned generator run.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Trait the generator derives.
    pub trait_name: String,

    /// Resolved program.
    pub program: Program,

    /// Contract arguments (`-pkg`, `-files`, `-names`).
    pub args: Vec<String>,
}

impl Invocation {
    /// Full argument vector, program first.
    pub fn argv(&self) -> Vec<String> {
        let (program, mut args) = self.program.base_command();
        args.extend(self.args.iter().cloned());
        let mut argv = vec![program.to_string_lossy().into_owned()];
        argv.extend(args);
        argv
    }

    fn command(&self, package_dir: &Path) -> Command {
        let (program, base_args) = self.program.base_command();
        let mut command = Command::new(program);
        command
            .args(base_args)
            .args(&self.args)
            .current_dir(package_dir);
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// What happened to one trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The generator exited successfully.
    Succeeded { output: String },
    /// The generator exited with a failure status, or could not be started.
    Failed { status: Option<i32>, output: String },
    /// Dry run: the generator was not started.
    NotRun,
    /// Declarations requested the trait but no generator is configured.
    Skipped,
}

/// Outcome for one trait.
#[derive(Debug, Clone)]
pub struct TraitReport {
    pub trait_name: String,
    pub outcome: Outcome,
}

/// Outcomes for a whole run, in processing order.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub traits: Vec<TraitReport>,
}

impl DispatchReport {
    /// Number of generators that were started.
    pub fn invoked(&self) -> usize {
        self.traits
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Succeeded { .. } | Outcome::Failed { .. }))
            .count()
    }

    /// Whether any generator failed.
    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Traits whose generator failed.
    pub fn failed(&self) -> impl Iterator<Item = &TraitReport> {
        self.traits
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed { .. }))
    }

    /// Outcome for a trait, if it was considered.
    pub fn outcome(&self, trait_name: &str) -> Option<&Outcome> {
        self.traits
            .iter()
            .find(|r| r.trait_name == trait_name)
            .map(|r| &r.outcome)
    }
}

/// Dispatches trait groups to their generators.
#[derive(Debug)]
pub struct Dispatcher<'a> {
    config: &'a GeneratorConfig,
    package_dir: PathBuf,
    package: String,
    dry_run: bool,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher for a package.
    pub fn new(
        config: &'a GeneratorConfig,
        package_dir: impl Into<PathBuf>,
        package: impl Into<String>,
    ) -> Self {
        Self {
            config,
            package_dir: package_dir.into(),
            package: package.into(),
            dry_run: false,
        }
    }

    /// Plan invocations without running them.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Resolve a generator for every non-empty group that has one configured.
    ///
    /// Invocations are sorted by trait name. Any unresolved program fails the
    /// whole plan.
    pub fn plan(&self, groups: &TraitGroups) -> CliResult<Vec<Invocation>> {
        let mut invocations = Vec::new();

        for (trait_name, program) in self.config.iter() {
            let Some(group) = groups.get(trait_name) else {
                tracing::debug!(trait_name, program, "No declarations request trait");
                continue;
            };

            let program = Program::resolve(trait_name, program, &self.package_dir)?;
            invocations.push(Invocation {
                trait_name: trait_name.to_string(),
                program,
                args: group.to_args(&self.package).to_command_args(),
            });
        }

        Ok(invocations)
    }

    /// Traits requested by declarations that have no configured generator.
    pub fn unconfigured<'g>(&self, groups: &'g TraitGroups) -> Vec<&'g str> {
        groups
            .iter()
            .filter(|(name, group)| !group.is_empty() && self.config.get(name).is_none())
            .map(|(name, _)| name)
            .collect()
    }

    /// Run one invocation to completion.
    ///
    /// A program that cannot be started counts as a failed generator.
    pub fn execute(&self, invocation: &Invocation) -> Outcome {
        if self.dry_run {
            return Outcome::NotRun;
        }

        tracing::info!(trait_name = %invocation.trait_name, command = %invocation, "Running generator");

        let output = match invocation.command(&self.package_dir).output() {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(trait_name = %invocation.trait_name, error = %e, "Generator failed to start");
                return Outcome::Failed {
                    status: None,
                    output: format!(
                        "failed to start '{}': {}\n",
                        invocation.program.base_command().0.display(),
                        e
                    ),
                };
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Outcome::Succeeded { output: combined }
        } else {
            tracing::warn!(
                trait_name = %invocation.trait_name,
                status = ?output.status.code(),
                "Generator failed"
            );
            Outcome::Failed {
                status: output.status.code(),
                output: combined,
            }
        }
    }

    /// Plan and run every generator, one after another.
    ///
    /// `before_each` sees every invocation just before it starts. Traits with
    /// no configured generator are appended as [`Outcome::Skipped`].
    pub fn run<F>(&self, groups: &TraitGroups, mut before_each: F) -> CliResult<DispatchReport>
    where
        F: FnMut(&Invocation),
    {
        let invocations = self.plan(groups)?;
        let mut report = DispatchReport::default();

        for invocation in &invocations {
            before_each(invocation);
            report.traits.push(TraitReport {
                trait_name: invocation.trait_name.clone(),
                outcome: self.execute(invocation),
            });
        }

        for trait_name in self.unconfigured(groups) {
            report.traits.push(TraitReport {
                trait_name: trait_name.to_string(),
                outcome: Outcome::Skipped,
            });
        }

        Ok(report)
    }
}
