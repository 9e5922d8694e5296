//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use std::fmt;
use strata::Error as LibError;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Semantic failure (e.g., a file failed validation) - exit code 1.
    SemanticFailure(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Semantic failure (e.g., a configuration was rejected)
    /// - 3: Configuration file missing
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Fragment format, merge or round-trip error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SemanticFailure(_) => 1,
            CliError::Library(lib_err) => library_exit_code(lib_err),
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
        }
    }
}

fn library_exit_code(err: &LibError) -> i32 {
    match err {
        LibError::InvalidConfigFile { .. } | LibError::Validation { .. } => 1,
        LibError::MissingConfigFile { .. } => 3,
        LibError::StartupAborted { failures } => {
            if failures
                .iter()
                .any(|f| matches!(f, LibError::MissingConfigFile { .. }))
            {
                3
            } else {
                1
            }
        }
        LibError::InvalidPath { .. } | LibError::UnknownCategory { .. } => 4,
        LibError::ConfigWrite { .. } | LibError::Io(_) => 5,
        LibError::ConfigFormat { .. }
        | LibError::ConfigMerge { .. }
        | LibError::ConfigRoundTrip { .. } => 7,
        _ => 6,
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::SemanticFailure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(e.into())
    }
}
