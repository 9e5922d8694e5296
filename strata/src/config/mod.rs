//! Configuration fragments and their collapse into one file.
//!
//! This module provides the pieces used to collapse a directory of partial
//! configuration files:
//! - Fragment discovery and loading, with shape checks
//! - Merging with set/list-aware accumulation
//! - Canonical serialization
//! - Round-trip verification of the written file
//!
//! # File Format
//!
//! A fragment is a YAML mapping whose values are either sets (tagged `!!set`
//! or `!set`) or lists of strings. An untagged nested mapping is rejected:
//!
//! ```yaml
//! beauty: !!set
//!   diffuse: null
//!   spec: null
//! rgba:
//!   - red
//!   - green
//!   - blue
//!   - alpha
//! ```
//!
//! # Examples
//!
//! ```
//! use strata::config::{ConfigMerger, FragmentLoader, MergePolicy};
//! use std::path::Path;
//!
//! let a = FragmentLoader::load_str(Path::new("a.yaml"), "beauty: !!set {diffuse, spec}")
//!     .unwrap()
//!     .unwrap();
//! let b = FragmentLoader::load_str(Path::new("b.yaml"), "beauty: !!set {spec, reflect}")
//!     .unwrap()
//!     .unwrap();
//!
//! let merged = ConfigMerger::merge(vec![a, b], MergePolicy::Sorted).unwrap();
//! assert_eq!(merged["beauty"], ["diffuse", "reflect", "spec"]);
//! ```

pub mod loader;
pub mod merger;
pub mod schema;
pub mod serializer;
pub mod verifier;

#[cfg(test)]
mod proptests;

// Re-export key types at module root
pub use loader::{FragmentLoader, FRAGMENT_EXTENSIONS};
pub use merger::ConfigMerger;
pub use schema::{CollapsedConfig, Collection, CollectionKind, Fragment, MergePolicy};
pub use serializer::ConfigSerializer;
pub use verifier::RoundTripVerifier;
