//! High-level operations built on the configuration primitives.
//!
//! - [`collapse`] / [`collapse_with`]: merge a fragment directory into one
//!   canonical, verified configuration file

pub mod collapse;

pub use collapse::{collapse, collapse_with, CollapseOptions, CollapseReport};
