//! Command to show where a category's configuration comes from.

use crate::error::CliError;
use crate::utils::{resolve_configs_dir, GlobalOptions};
use clap::Args;
use strata::resolve::{CategoryRegistry, EnvironmentOverrides, OverrideStore};

/// Show a category's default path and override variable.
#[derive(Args)]
pub struct ShowCommand {
    /// Category name (layers or channels)
    #[arg(value_name = "CATEGORY")]
    pub category: String,
}

impl ShowCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let configs_dir = resolve_configs_dir(global)?;
        let registry = CategoryRegistry::builtin(&configs_dir);
        let category = registry.get(&self.category)?;

        println!("category: {}", category.name());
        println!("default: {}", category.default_path().display());
        println!("variable: {}", category.override_var());
        match EnvironmentOverrides.get(category.override_var()) {
            Some(path) => println!("override: {}", path.display()),
            None => println!("override: (unset)"),
        }
        println!("policy: {}", category.merge_policy());
        Ok(())
    }
}
