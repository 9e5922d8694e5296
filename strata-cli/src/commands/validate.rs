//! Command to validate collapsed configuration files.
//!
//! This is the external validator contract: a zero exit status means every
//! file given is valid.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use std::path::PathBuf;
use strata::validation::{ConfigValidator, InProcessValidator};

/// Check that files are valid collapsed configurations.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration files to validate
    #[arg(value_name = "CONFIG", required = true)]
    pub configs: Vec<PathBuf>,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut failed = 0;
        for path in &self.configs {
            match InProcessValidator.validate(path) {
                Ok(()) => {
                    if !global.quiet {
                        println!("{}: valid", path.display());
                    }
                }
                Err(e) => {
                    failed += 1;
                    if !global.quiet {
                        eprintln!("{}: {e}", path.display());
                    }
                }
            }
        }

        if failed == 0 {
            Ok(())
        } else {
            Err(CliError::SemanticFailure(format!(
                "{failed} of {} configuration file(s) failed validation",
                self.configs.len()
            )))
        }
    }
}
