//! Sources of per-category override paths.
//!
//! The host hands override paths over as environment variables. The
//! resolver reads them through [`OverrideStore`] so the environment can be
//! swapped for an explicit map.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

/// Where override paths are read from and resolved defaults are published to.
pub trait OverrideStore {
    /// Returns the override path for `var`, if one is set.
    ///
    /// Empty values count as unset.
    fn get(&self, var: &str) -> Option<PathBuf>;

    /// Records `path` under `var` for later readers.
    fn publish(&mut self, var: &str, path: &Path);
}

/// Overrides read from and published to the process environment.
///
/// Publishing modifies process-wide state; call it only from startup code
/// before other threads read the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentOverrides;

impl OverrideStore for EnvironmentOverrides {
    fn get(&self, var: &str) -> Option<PathBuf> {
        env::var_os(var)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    fn publish(&mut self, var: &str, path: &Path) {
        env::set_var(var, path);
    }
}

/// Overrides held in memory.
///
/// # Examples
///
/// ```
/// use strata::resolve::{MemoryOverrides, OverrideStore};
/// use std::path::{Path, PathBuf};
///
/// let mut overrides = MemoryOverrides::new().with("STRATA_LAYER_CONFIG", "/show/layers.yaml");
/// assert_eq!(
///     overrides.get("STRATA_LAYER_CONFIG"),
///     Some(PathBuf::from("/show/layers.yaml"))
/// );
///
/// overrides.publish("STRATA_CHANNEL_CONFIG", Path::new("/configs/channels.yaml"));
/// assert!(overrides.get("STRATA_CHANNEL_CONFIG").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryOverrides {
    values: BTreeMap<String, PathBuf>,
}

impl MemoryOverrides {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    #[must_use]
    pub fn with(mut self, var: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.values.insert(var.into(), path.into());
        self
    }

    /// Iterates all stored values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

impl OverrideStore for MemoryOverrides {
    fn get(&self, var: &str) -> Option<PathBuf> {
        self.values
            .get(var)
            .filter(|path| !path.as_os_str().is_empty())
            .cloned()
    }

    fn publish(&mut self, var: &str, path: &Path) {
        self.values.insert(var.to_string(), path.to_path_buf());
    }
}
