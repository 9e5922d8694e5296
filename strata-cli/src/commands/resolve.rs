//! Command to resolve the startup configuration.

use crate::error::CliError;
use crate::utils::{build_validator, resolve_configs_dir, GlobalOptions};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use strata::resolve::{CategoryRegistry, ConfigResolver, EnvironmentOverrides, ResolvedConfig};
use strata::validation::DEFAULT_VALIDATOR_TIMEOUT;

/// Output format for resolved configuration.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ResolveFormat {
    /// `VAR=path` lines, suitable for `eval`
    #[default]
    Env,
    /// JSON document
    Json,
}

/// Resolve the configuration files used at startup.
#[derive(Args)]
pub struct ResolveCommand {
    /// External validator program (path is passed as its last argument)
    #[arg(long, value_name = "PROGRAM", env = "STRATA_VALIDATOR")]
    pub validator: Option<PathBuf>,

    /// Argument passed to the validator before the path (repeatable)
    #[arg(long = "validator-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub validator_args: Vec<String>,

    /// Seconds the validator may run before the file counts as invalid
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_VALIDATOR_TIMEOUT.as_secs())]
    pub validator_timeout: u64,

    /// Validate categories concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: ResolveFormat,
}

impl ResolveCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let configs_dir = resolve_configs_dir(global)?;
        let registry = CategoryRegistry::builtin(&configs_dir);
        let validator = build_validator(
            self.validator,
            self.validator_args,
            self.validator_timeout,
        )?;

        let resolver = ConfigResolver::new(validator);
        let mut overrides = EnvironmentOverrides;
        let resolved = if self.parallel {
            resolver.resolve_all_parallel(&registry, &mut overrides)?
        } else {
            resolver.resolve_all(&registry, &mut overrides)?
        };

        print!("{}", format_resolved(&resolved, self.format)?);
        Ok(())
    }
}

fn format_resolved(resolved: &ResolvedConfig, format: ResolveFormat) -> Result<String, CliError> {
    match format {
        ResolveFormat::Env => Ok(resolved
            .iter()
            .map(|entry| format!("{}={}\n", entry.override_var(), entry.path().display()))
            .collect()),
        ResolveFormat::Json => {
            let mut json = serde_json::to_string_pretty(resolved)?;
            json.push('\n');
            Ok(json)
        }
    }
}
