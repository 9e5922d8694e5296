//! Startup resolution of configuration files.
//!
//! Each category moves through
//! `Unresolved -> OverrideCheck -> ValidatingOverride | ValidatingDefault -> Resolved | Fatal`.
//! A missing file is fatal without consulting the validator; a file the
//! validator rejects is fatal too. Categories are independent, but startup
//! fails if any of them ends up fatal.

use crate::error::{Error, Result};
use crate::resolve::category::{Category, CategoryRegistry};
use crate::resolve::overrides::OverrideStore;
use crate::validation::ConfigValidator;
use serde::Serialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;

/// Where a resolved path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigProvenance {
    /// Supplied through the category's override variable.
    Override,
    /// The category's bundled default file.
    BundledDefault,
}

impl fmt::Display for ConfigProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => write!(f, "override"),
            Self::BundledDefault => write!(f, "bundled default"),
        }
    }
}

/// The outcome of resolving one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfigEntry {
    category: String,
    override_var: String,
    path: PathBuf,
    provenance: ConfigProvenance,
    valid: bool,
}

impl ResolvedConfigEntry {
    /// Returns the category name.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the category's override variable.
    #[must_use]
    pub fn override_var(&self) -> &str {
        &self.override_var
    }

    /// Returns the absolute path of the validated file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns where the path came from.
    #[must_use]
    pub const fn provenance(&self) -> ConfigProvenance {
        self.provenance
    }

    /// Returns true if the validator accepted the file.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Every category's resolved file, built once at startup.
///
/// # Examples
///
/// ```no_run
/// use strata::resolve::{CategoryRegistry, ConfigResolver, EnvironmentOverrides};
/// use strata::validation::InProcessValidator;
/// use std::path::Path;
///
/// let registry = CategoryRegistry::builtin(Path::new("/opt/strata/configs"));
/// let resolver = ConfigResolver::new(InProcessValidator);
/// let resolved = resolver.resolve_all(&registry, &mut EnvironmentOverrides).unwrap();
/// println!("layers: {}", resolved.path("layers").unwrap().display());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    entries: Vec<ResolvedConfigEntry>,
}

impl ResolvedConfig {
    /// Look up a category's entry.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&ResolvedConfigEntry> {
        self.entries.iter().find(|e| e.category == category)
    }

    /// Look up a category's resolved path.
    #[must_use]
    pub fn path(&self, category: &str) -> Option<&Path> {
        self.get(category).map(ResolvedConfigEntry::path)
    }

    /// Iterates entries in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedConfigEntry> {
        self.entries.iter()
    }

    /// Number of resolved categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One step of a category's resolution.
#[derive(Debug)]
pub enum ResolutionState {
    /// Nothing looked at yet.
    Unresolved,
    /// Looking for an override.
    OverrideCheck,
    /// Checking an override path.
    ValidatingOverride(PathBuf),
    /// Checking the bundled default.
    ValidatingDefault(PathBuf),
    /// Finished successfully.
    Resolved(ResolvedConfigEntry),
    /// Finished with an error that must halt startup.
    Fatal(Error),
}

impl ResolutionState {
    fn name(&self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::OverrideCheck => "override-check",
            Self::ValidatingOverride(_) => "validating-override",
            Self::ValidatingDefault(_) => "validating-default",
            Self::Resolved(_) => "resolved",
            Self::Fatal(_) => "fatal",
        }
    }
}

/// Resolves categories against an override store and a validator.
///
/// # Examples
///
/// ```
/// use strata::resolve::{Category, ConfigResolver, MemoryOverrides};
/// use strata::validation::InProcessValidator;
/// use strata::Error;
///
/// let category = Category::new("layers", "/nonexistent/layers.yaml", "STRATA_LAYER_CONFIG");
/// let resolver = ConfigResolver::new(InProcessValidator);
/// let err = resolver.resolve(&category, &mut MemoryOverrides::new()).unwrap_err();
/// assert!(matches!(err, Error::MissingConfigFile { .. }));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigResolver<V> {
    validator: V,
}

impl<V: ConfigValidator> ConfigResolver<V> {
    /// Creates a resolver using `validator`.
    pub const fn new(validator: V) -> Self {
        Self { validator }
    }

    /// Returns the validator.
    pub const fn validator(&self) -> &V {
        &self.validator
    }

    /// Resolve one category.
    ///
    /// When the default is used, its path is published to `overrides` under
    /// the category's variable once it validates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfigFile`] or [`Error::InvalidConfigFile`].
    pub fn resolve<O>(&self, category: &Category, overrides: &mut O) -> Result<ResolvedConfigEntry>
    where
        O: OverrideStore + ?Sized,
    {
        let state = Self::begin(category, &*overrides);
        let state = self.check(category, state);
        Self::finish(category, state, overrides)
    }

    /// Resolve every category, attempting all of them before failing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StartupAborted`] holding every fatal category's error.
    pub fn resolve_all<O>(&self, registry: &CategoryRegistry, overrides: &mut O) -> Result<ResolvedConfig>
    where
        O: OverrideStore + ?Sized,
    {
        let results = registry
            .iter()
            .map(|category| (category, self.resolve(category, overrides)))
            .collect::<Vec<_>>();
        Self::aggregate(results)
    }

    /// Advance from `Unresolved` to one of the validating states.
    fn begin<O>(category: &Category, overrides: &O) -> ResolutionState
    where
        O: OverrideStore + ?Sized,
    {
        let mut state = ResolutionState::Unresolved;
        loop {
            let from = state.name();
            state = match state {
                ResolutionState::Unresolved => ResolutionState::OverrideCheck,
                ResolutionState::OverrideCheck => match overrides.get(category.override_var()) {
                    Some(path) => ResolutionState::ValidatingOverride(absolute(&path)),
                    None => ResolutionState::ValidatingDefault(absolute(category.default_path())),
                },
                other => return other,
            };
            log::debug!("{}: {from} -> {}", category.name(), state.name());
        }
    }

    /// Run the existence check and the validator on a validating state.
    fn check(&self, category: &Category, state: ResolutionState) -> ResolutionState {
        let (path, provenance) = match state {
            ResolutionState::ValidatingOverride(path) => (path, ConfigProvenance::Override),
            ResolutionState::ValidatingDefault(path) => (path, ConfigProvenance::BundledDefault),
            other => return other,
        };

        let next = if !path.is_file() {
            ResolutionState::Fatal(Error::MissingConfigFile {
                category: category.name().to_string(),
                path,
            })
        } else {
            match self.validator.validate(&path) {
                Ok(()) => ResolutionState::Resolved(ResolvedConfigEntry {
                    category: category.name().to_string(),
                    override_var: category.override_var().to_string(),
                    path,
                    provenance,
                    valid: true,
                }),
                Err(e) => ResolutionState::Fatal(Error::InvalidConfigFile {
                    category: category.name().to_string(),
                    path,
                    reason: e.to_string(),
                }),
            }
        };
        log::debug!("{}: validating {provenance} -> {}", category.name(), next.name());
        next
    }

    fn finish<O>(category: &Category, state: ResolutionState, overrides: &mut O) -> Result<ResolvedConfigEntry>
    where
        O: OverrideStore + ?Sized,
    {
        match state {
            ResolutionState::Resolved(entry) => {
                if entry.provenance == ConfigProvenance::BundledDefault {
                    overrides.publish(category.override_var(), &entry.path);
                }
                log::info!(
                    "{} configuration: {} ({})",
                    category.name(),
                    entry.path.display(),
                    entry.provenance
                );
                Ok(entry)
            }
            ResolutionState::Fatal(err) => {
                log::debug!("{} resolution failed", category.name());
                Err(err)
            }
            other => Err(Error::Validation {
                field: category.name().to_string(),
                message: format!("resolution stopped in state {}", other.name()),
            }),
        }
    }

    fn aggregate(results: Vec<(&Category, Result<ResolvedConfigEntry>)>) -> Result<ResolvedConfig> {
        let mut entries = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (_, result) in results {
            match result {
                Ok(entry) => entries.push(entry),
                Err(err) => failures.push(err),
            }
        }

        if failures.is_empty() {
            Ok(ResolvedConfig { entries })
        } else {
            Err(Error::StartupAborted { failures })
        }
    }
}

impl<V: ConfigValidator + Sync> ConfigResolver<V> {
    /// Like [`ConfigResolver::resolve_all`], but validates categories on
    /// separate threads.
    ///
    /// Overrides are read and published on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StartupAborted`] holding every fatal category's error.
    pub fn resolve_all_parallel<O>(
        &self,
        registry: &CategoryRegistry,
        overrides: &mut O,
    ) -> Result<ResolvedConfig>
    where
        O: OverrideStore + ?Sized,
    {
        let pending: Vec<_> = registry
            .iter()
            .map(|category| (category, Self::begin(category, &*overrides)))
            .collect();

        let checked: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = pending
                .into_iter()
                .map(|(category, state)| {
                    (category, scope.spawn(move || self.check(category, state)))
                })
                .collect();
            handles
                .into_iter()
                .map(|(category, handle)| {
                    let state = handle.join().unwrap_or_else(|_| {
                        ResolutionState::Fatal(Error::Validation {
                            field: category.name().to_string(),
                            message: "validator thread panicked".into(),
                        })
                    });
                    (category, state)
                })
                .collect()
        });

        let results = checked
            .into_iter()
            .map(|(category, state)| (category, Self::finish(category, state, overrides)))
            .collect();
        Self::aggregate(results)
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
