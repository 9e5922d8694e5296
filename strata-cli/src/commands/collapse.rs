//! Command to collapse a fragment directory.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use std::path::PathBuf;
use strata::config::MergePolicy;
use strata::operations::{collapse_with, CollapseOptions};

/// Collapse a directory of fragments into one configuration file.
#[derive(Args)]
pub struct CollapseCommand {
    /// Directory holding the fragment files
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Destination of the collapsed configuration
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Sort every value (default for directories named *layers)
    #[arg(long, conflicts_with = "preserve_order")]
    pub sort: bool,

    /// Keep values in the order they were found
    #[arg(long)]
    pub preserve_order: bool,

    /// Print the collapsed configuration instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl CollapseCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut options = CollapseOptions::default().with_dry_run(self.dry_run);
        if self.sort {
            options = options.with_policy(MergePolicy::Sorted);
        } else if self.preserve_order {
            options = options.with_policy(MergePolicy::PreserveOrder);
        }

        let report = collapse_with(&self.dir, &self.output, &options)?;

        if global.verbose {
            for path in &report.fragments {
                eprintln!("merged {}", path.display());
            }
            for path in &report.skipped {
                eprintln!("skipped empty {}", path.display());
            }
        }

        match report.rendered {
            Some(rendered) => print!("{rendered}"),
            None => {
                if !global.quiet {
                    println!(
                        "Collapsed {} fragment(s) into {} ({} keys, {})",
                        report.fragments.len(),
                        report.output.display(),
                        report.config.len(),
                        report.policy
                    );
                }
            }
        }

        Ok(())
    }
}
