//! Startup configuration resolution.
//!
//! At process start every [`Category`] is resolved to one file: the path in
//! its override variable if set, otherwise its bundled default. The file must
//! exist and pass a [`ConfigValidator`](crate::validation::ConfigValidator)
//! before the path is handed to the rest of the process. Any failure is
//! meant to stop startup.
//!
//! # Examples
//!
//! ```no_run
//! use strata::resolve::{default_configs_dir, CategoryRegistry, ConfigResolver, EnvironmentOverrides};
//! use strata::validation::ProcessValidator;
//!
//! let registry = CategoryRegistry::builtin(&default_configs_dir().unwrap());
//! let resolver = ConfigResolver::new(ProcessValidator::new("/opt/strata/bin/config-tester"));
//!
//! match resolver.resolve_all(&registry, &mut EnvironmentOverrides) {
//!     Ok(resolved) => {
//!         for entry in resolved.iter() {
//!             println!("{} = {}", entry.override_var(), entry.path().display());
//!         }
//!     }
//!     Err(e) => {
//!         eprintln!("{e}");
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod category;
pub mod overrides;
pub mod resolver;

pub use category::{
    default_configs_dir, Category, CategoryRegistry, CHANNEL_CONFIG_VAR, CONFIGS_DIR_VAR,
    CONFIG_EXTENSION, LAYER_CONFIG_VAR,
};
pub use overrides::{EnvironmentOverrides, MemoryOverrides, OverrideStore};
pub use resolver::{
    ConfigProvenance, ConfigResolver, ResolutionState, ResolvedConfig, ResolvedConfigEntry,
};
