//! Main entry point for the strata CLI.
//!
//! This is the command-line interface for layer and channel configuration.
//! It provides commands for:
//! - `collapse`: Collapse a fragment directory into one configuration file
//! - `validate`: Check collapsed configuration files
//! - `resolve`: Resolve the startup configuration from the environment
//! - `show`: Show where a category's configuration comes from

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _logger = strata::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        configs_dir: cli.configs_dir,
    };

    let result = match cli.command {
        cli::Command::Collapse(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Resolve(cmd) => cmd.execute(&global),
        cli::Command::Show(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            if !global.quiet {
                eprintln!("Error: {e}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
