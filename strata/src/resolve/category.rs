//! Configuration categories and where their files live.

use crate::config::MergePolicy;
use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Override variable for the layer category.
pub const LAYER_CONFIG_VAR: &str = "STRATA_LAYER_CONFIG";

/// Override variable for the channel category.
pub const CHANNEL_CONFIG_VAR: &str = "STRATA_CHANNEL_CONFIG";

/// Variable pointing at the bundled configuration directory.
pub const CONFIGS_DIR_VAR: &str = "STRATA_CONFIGS_DIR";

/// Extension of bundled default files.
pub const CONFIG_EXTENSION: &str = "yaml";

/// A named configuration domain with a bundled default and an override.
///
/// # Examples
///
/// ```
/// use strata::resolve::Category;
/// use std::path::Path;
///
/// let layers = Category::bundled("layers", Path::new("/opt/strata/configs"), "STRATA_LAYER_CONFIG");
/// assert_eq!(layers.default_path(), Path::new("/opt/strata/configs/layers.yaml"));
/// assert_eq!(layers.override_var(), "STRATA_LAYER_CONFIG");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    default_path: PathBuf,
    override_var: String,
}

impl Category {
    /// Creates a category with an explicit default path.
    pub fn new(
        name: impl Into<String>,
        default_path: impl Into<PathBuf>,
        override_var: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            default_path: default_path.into(),
            override_var: override_var.into(),
        }
    }

    /// Creates a category whose default is `<configs_dir>/<name>.yaml`.
    pub fn bundled(name: impl Into<String>, configs_dir: &Path, override_var: impl Into<String>) -> Self {
        let name = name.into();
        let default_path = configs_dir.join(format!("{name}.{CONFIG_EXTENSION}"));
        Self::new(name, default_path, override_var)
    }

    /// Returns the category name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bundled default file.
    #[must_use]
    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// Returns the override variable name.
    #[must_use]
    pub fn override_var(&self) -> &str {
        &self.override_var
    }

    /// Merge policy used when collapsing this category's fragments.
    #[must_use]
    pub fn merge_policy(&self) -> MergePolicy {
        MergePolicy::for_directory(Path::new(&self.name))
    }
}

/// The fixed set of categories resolved at startup.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Creates a registry from explicit categories.
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The built-in `layers` and `channels` categories under `configs_dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata::resolve::CategoryRegistry;
    /// use std::path::Path;
    ///
    /// let registry = CategoryRegistry::builtin(Path::new("/opt/strata/configs"));
    /// let names: Vec<_> = registry.iter().map(|c| c.name()).collect();
    /// assert_eq!(names, ["layers", "channels"]);
    /// ```
    #[must_use]
    pub fn builtin(configs_dir: &Path) -> Self {
        Self::new(vec![
            Category::bundled("layers", configs_dir, LAYER_CONFIG_VAR),
            Category::bundled("channels", configs_dir, CHANNEL_CONFIG_VAR),
        ])
    }

    /// Look up a category by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCategory`] if no category has that name.
    pub fn get(&self, name: &str) -> Result<&Category> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::UnknownCategory {
                name: name.to_string(),
            })
    }

    /// Iterates categories in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true if there are no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Directory holding the bundled default files.
///
/// Uses `STRATA_CONFIGS_DIR` when set, otherwise the `configs` directory
/// beside the directory holding the running executable.
///
/// # Errors
///
/// Returns an error if the executable's location cannot be determined.
pub fn default_configs_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(CONFIGS_DIR_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let exe = env::current_exe()?;
    let install_root = exe
        .parent()
        .and_then(Path::parent)
        .ok_or_else(|| Error::InvalidPath {
            path: exe.clone(),
            reason: "executable has no install root".into(),
        })?;
    Ok(install_root.join("configs"))
}
