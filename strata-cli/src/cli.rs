//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CollapseCommand, ResolveCommand, ShowCommand, ValidateCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for layer and channel configuration.
#[derive(Parser)]
#[command(name = "strata")]
#[command(version, about = "Collapse and resolve layer/channel configuration", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Directory holding the bundled default configurations
    #[arg(long, value_name = "PATH", global = true, env = "STRATA_CONFIGS_DIR")]
    pub configs_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Collapse a directory of fragments into one configuration file
    Collapse(CollapseCommand),

    /// Check that files are valid collapsed configurations
    Validate(ValidateCommand),

    /// Resolve the configuration files used at startup
    Resolve(ResolveCommand),

    /// Show where a category's configuration comes from
    Show(ShowCommand),
}
