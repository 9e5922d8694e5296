#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # strata
//!
//! A library for collapsing layer and channel configuration fragments into
//! canonical files, and for resolving the configuration a host process uses
//! at startup.
//!
//! ## Core Types
//!
//! - [`Fragment`] and [`CollectionKind`]: one authored fragment file
//! - [`ConfigMerger`] and [`MergePolicy`]: set/list-aware accumulation
//! - [`ConfigSerializer`] and [`RoundTripVerifier`]: canonical output
//! - [`collapse`]: the whole directory-to-file operation
//! - [`ConfigResolver`] and [`ConfigValidator`]: fail-fast startup resolution
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use strata::config::{Collection, ConfigMerger, Fragment, MergePolicy};
//!
//! let a = Fragment::new("a.yaml").with("beauty", Collection::set(["diffuse", "spec"]));
//! let b = Fragment::new("b.yaml").with("beauty", Collection::set(["spec", "reflect"]));
//!
//! let merged = ConfigMerger::merge(vec![a, b], MergePolicy::Sorted).unwrap();
//! assert_eq!(merged["beauty"], ["diffuse", "reflect", "spec"]);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod resolve;
pub mod validation;

// Re-export key types at crate root for convenience
pub use config::{
    CollapsedConfig, Collection, CollectionKind, ConfigMerger, ConfigSerializer, Fragment,
    FragmentLoader, MergePolicy, RoundTripVerifier,
};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{collapse, collapse_with, CollapseOptions, CollapseReport};
pub use resolve::{
    Category, CategoryRegistry, ConfigProvenance, ConfigResolver, EnvironmentOverrides,
    MemoryOverrides, OverrideStore, ResolvedConfig, ResolvedConfigEntry,
};
pub use validation::{ConfigValidator, InProcessValidator, ProcessValidator};
