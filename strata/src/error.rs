//! Error types for the strata library.
//!
//! This module provides the error hierarchy for fragment collapsing and
//! startup configuration resolution, using `thiserror` for ergonomic error
//! handling.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::CollectionKind;

/// Result type alias for operations that may fail with a strata error.
///
/// # Examples
///
/// ```
/// use strata::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(2)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the strata library.
#[derive(Debug, Error)]
pub enum Error {
    /// A fragment does not have the shape of a mapping of sets or lists.
    #[error("{} is not a mapping of sets or lists: {reason}", path.display())]
    ConfigFormat {
        /// The offending fragment file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The same key was authored as a set in one fragment and a list in another.
    #[error(
        "cannot merge key '{key}' from {}: already collected as a {existing}, found a {incoming}",
        path.display()
    )]
    ConfigMerge {
        /// The conflicting key.
        key: String,
        /// Kind accumulated from earlier fragments.
        existing: CollectionKind,
        /// Kind found in the fragment being merged.
        incoming: CollectionKind,
        /// The fragment that introduced the conflict.
        path: PathBuf,
    },

    /// Writing the collapsed configuration failed.
    #[error("failed to write collapsed configuration {}: {source}", path.display())]
    ConfigWrite {
        /// The destination file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The written artifact did not reload to a configuration.
    #[error("collapsed configuration {} failed to reload: {reason}", path.display())]
    ConfigRoundTrip {
        /// The written file.
        path: PathBuf,
        /// Why reloading failed.
        reason: String,
    },

    /// The resolved configuration file does not exist.
    #[error("missing {category} configuration file: {}", path.display())]
    MissingConfigFile {
        /// The category being resolved.
        category: String,
        /// The candidate path.
        path: PathBuf,
    },

    /// The validator rejected the resolved configuration file.
    #[error("invalid {category} configuration file {}: {reason}", path.display())]
    InvalidConfigFile {
        /// The category being resolved.
        category: String,
        /// The candidate path.
        path: PathBuf,
        /// The validator's reason.
        reason: String,
    },

    /// One or more categories failed to resolve at startup.
    #[error("startup aborted, {} configuration(s) failed: {}", failures.len(), FailureList(failures))]
    StartupAborted {
        /// Every fatal category failure, in resolution order.
        failures: Vec<Error>,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field or file that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A category name is not registered.
    #[error("unknown configuration category: {name}")]
    UnknownCategory {
        /// The requested name.
        name: String,
    },

    /// A YAML scalar could not be rendered.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

struct FailureList<'a>(&'a [Error]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Check if error should halt host startup.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::MissingConfigFile {
    ///     category: "layers".to_string(),
    ///     path: PathBuf::from("/configs/layers.yaml"),
    /// };
    /// assert!(err.is_fatal_startup());
    /// ```
    #[must_use]
    pub fn is_fatal_startup(&self) -> bool {
        matches!(
            self,
            Self::MissingConfigFile { .. }
                | Self::InvalidConfigFile { .. }
                | Self::StartupAborted { .. }
        )
    }

    /// Check if error aborted a collapse operation.
    #[must_use]
    pub fn is_collapse_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigFormat { .. }
                | Self::ConfigMerge { .. }
                | Self::ConfigWrite { .. }
                | Self::ConfigRoundTrip { .. }
        )
    }
}
