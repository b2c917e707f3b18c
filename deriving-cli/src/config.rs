//! Configuration management for the orchestrator.
//!
//! Generators come from `Trait=path` command-line pairs, optionally merged
//! over a `deriving.toml` in the package directory. The merged result is an
//! immutable [`GeneratorConfig`] handed to the dispatcher.

use crate::error::{CliResult, ConfigError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default configuration filename, looked up in the package directory.
pub const CONFIG_FILENAME: &str = "deriving.toml";

/// Contents of a `deriving.toml` file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Package name passed to generators.
    pub package: Option<String>,

    /// Trait name to generator program path.
    pub generators: BTreeMap<String, String>,
}

/// One `Trait=path` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSpec {
    /// Trait the generator derives.
    pub trait_name: String,

    /// Program path, relative to the package directory or on `PATH`.
    pub program: String,
}

impl FromStr for GeneratorSpec {
    type Err = ConfigError;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = arg.split('=').collect();
        match parts.as_slice() {
            [name, program] if !name.is_empty() && !program.is_empty() => Ok(Self {
                trait_name: name.to_string(),
                program: program.to_string(),
            }),
            _ => Err(ConfigError::invalid_generator(arg)),
        }
    }
}

/// Immutable mapping from trait name to generator program.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    generators: BTreeMap<String, String>,
}

impl GeneratorConfig {
    /// Program configured for a trait.
    pub fn get(&self, trait_name: &str) -> Option<&str> {
        self.generators.get(trait_name).map(String::as_str)
    }

    /// Configured `(trait, program)` pairs, sorted by trait name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.generators
            .iter()
            .map(|(name, program)| (name.as_str(), program.as_str()))
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl FromIterator<GeneratorSpec> for GeneratorConfig {
    fn from_iter<I: IntoIterator<Item = GeneratorSpec>>(iter: I) -> Self {
        Self {
            generators: iter
                .into_iter()
                .map(|spec| (spec.trait_name, spec.program))
                .collect(),
        }
    }
}

impl Config {
    /// Validate entries and build the generator mapping.
    pub fn generator_config(&self) -> CliResult<GeneratorConfig> {
        for (name, program) in &self.generators {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid_value("generators", "empty trait name").into());
            }
            if program.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    format!("generators.{name}"),
                    "empty generator path",
                )
                .into());
            }
        }

        Ok(GeneratorConfig {
            generators: self.generators.clone(),
        })
    }

    /// Package name from the config, else the directory name.
    ///
    /// Directory names are mapped the way cargo maps package names to crate
    /// names, so `my-types` becomes `my_types`.
    pub fn package_name(&self, dir: &Path) -> String {
        if let Some(ref package) = self.package {
            return package.clone();
        }

        let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        resolved
            .file_name()
            .map(|name| name.to_string_lossy().replace('-', "_"))
            .unwrap_or_else(|| "crate".to_string())
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If `path` is None, looks for [`CONFIG_FILENAME`] in `package_dir`.
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>, package_dir: &Path) -> CliResult<Config> {
        let (config_path, explicit) = match path {
            Some(p) => (PathBuf::from(p), true),
            None => (package_dir.join(CONFIG_FILENAME), false),
        };

        if !config_path.exists() && !explicit {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path.clone(), e.to_string()))?;

        tracing::debug!(
            path = %config_path.display(),
            generators = config.generators.len(),
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values; a trait given
    /// twice on the command line keeps its last program.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref package) = args.package {
            config.package = Some(package.clone());
        }

        for spec in &args.generators {
            if let Some(previous) = config
                .generators
                .insert(spec.trait_name.clone(), spec.program.clone())
            {
                tracing::debug!(
                    trait_name = %spec.trait_name,
                    previous = %previous,
                    program = %spec.program,
                    "Generator overridden"
                );
            }
        }

        config
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Package name override.
    pub package: Option<String>,

    /// `Trait=path` pairs.
    pub generators: Vec<GeneratorSpec>,
}
