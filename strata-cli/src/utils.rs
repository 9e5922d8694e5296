//! Utility functions for CLI operations.

use crate::error::CliError;
use std::path::PathBuf;
use std::time::Duration;
use strata::resolve::default_configs_dir;
use strata::validation::{ConfigValidator, InProcessValidator, ProcessValidator};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the bundled configuration directory.
    pub configs_dir: Option<PathBuf>,
}

/// Resolve the bundled configuration directory.
///
/// Priority: `--configs-dir` (or `STRATA_CONFIGS_DIR`) > beside the executable.
pub fn resolve_configs_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match &global.configs_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_configs_dir().map_err(CliError::from),
    }
}

/// Build the validator used by the resolver.
///
/// Without a program the in-process validator is used.
pub fn build_validator(
    program: Option<PathBuf>,
    args: Vec<String>,
    timeout_secs: u64,
) -> Result<Box<dyn ConfigValidator + Sync>, CliError> {
    if timeout_secs == 0 {
        return Err(CliError::InvalidArguments(
            "--validator-timeout must be at least 1 second".to_string(),
        ));
    }

    Ok(match program {
        Some(program) => Box::new(
            ProcessValidator::new(program)
                .with_args(args)
                .with_timeout(Duration::from_secs(timeout_secs)),
        ),
        None => {
            if !args.is_empty() {
                return Err(CliError::InvalidArguments(
                    "--validator-arg requires --validator".to_string(),
                ));
            }
            Box::new(InProcessValidator)
        }
    })
}
