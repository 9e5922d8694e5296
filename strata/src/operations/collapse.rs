//! Collapsing a fragment directory into one configuration file.

use crate::config::{
    CollapsedConfig, ConfigMerger, ConfigSerializer, FragmentLoader, MergePolicy,
    RoundTripVerifier,
};
use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Options for a collapse.
///
/// # Examples
///
/// ```
/// use strata::config::MergePolicy;
/// use strata::operations::CollapseOptions;
///
/// let options = CollapseOptions::default().with_policy(MergePolicy::Sorted);
/// assert_eq!(options.policy, Some(MergePolicy::Sorted));
/// assert!(!options.dry_run);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollapseOptions {
    /// Force a merge policy instead of deriving it from the directory name.
    pub policy: Option<MergePolicy>,
    /// Merge and render without writing the destination file.
    pub dry_run: bool,
}

impl CollapseOptions {
    /// Force a merge policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set dry run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// What a collapse read and produced.
#[derive(Debug, Clone, Serialize)]
pub struct CollapseReport {
    /// Fragment files that contributed, in merge order.
    pub fragments: Vec<PathBuf>,
    /// Placeholder fragment files that contributed nothing.
    pub skipped: Vec<PathBuf>,
    /// Policy applied to every value.
    pub policy: MergePolicy,
    /// Destination file.
    pub output: PathBuf,
    /// The collapsed configuration. After a real run this is the reloaded
    /// file contents.
    pub config: CollapsedConfig,
    /// Rendered text, only set on a dry run.
    pub rendered: Option<String>,
}

/// Collapse every fragment in `dir` into `output`.
///
/// Returns the configuration as reloaded from `output`.
///
/// # Errors
///
/// Returns a format, merge, write or round-trip error; the destination may
/// be left partially written only if the round-trip check fails.
///
/// # Examples
///
/// ```no_run
/// use strata::operations::collapse;
/// use std::path::Path;
///
/// let layers = collapse(Path::new("configs/layers"), Path::new("configs/layers.yaml")).unwrap();
/// for (category, members) in &layers {
///     println!("{category}: {}", members.join(", "));
/// }
/// ```
pub fn collapse(dir: &Path, output: &Path) -> Result<CollapsedConfig> {
    collapse_with(dir, output, &CollapseOptions::default()).map(|report| report.config)
}

/// Collapse with explicit options, returning a full report.
///
/// # Errors
///
/// Same as [`collapse`].
pub fn collapse_with(dir: &Path, output: &Path, options: &CollapseOptions) -> Result<CollapseReport> {
    let policy = options
        .policy
        .unwrap_or_else(|| MergePolicy::for_directory(dir));
    log::debug!("collapsing {} with {policy} policy", dir.display());

    let mut merger = ConfigMerger::new();
    let mut fragments = Vec::new();
    let mut skipped = Vec::new();

    for path in FragmentLoader::discover(dir)? {
        if is_same_file(&path, output) {
            log::debug!("skipping collapse destination {}", path.display());
            continue;
        }
        match FragmentLoader::load_file(&path)? {
            Some(fragment) => {
                merger.merge_fragment(fragment)?;
                fragments.push(path);
            }
            None => {
                log::info!("skipping empty fragment {}", path.display());
                skipped.push(path);
            }
        }
    }

    let merged = merger.finish(policy);

    if options.dry_run {
        let rendered = ConfigSerializer::to_string(&merged)?;
        return Ok(CollapseReport {
            fragments,
            skipped,
            policy,
            output: output.to_path_buf(),
            config: merged,
            rendered: Some(rendered),
        });
    }

    ConfigSerializer::write(&merged, output)?;
    let config = RoundTripVerifier::verify(output, &merged)?;

    Ok(CollapseReport {
        fragments,
        skipped,
        policy,
        output: output.to_path_buf(),
        config,
        rendered: None,
    })
}

fn is_same_file(candidate: &Path, output: &Path) -> bool {
    match (candidate.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    fn fragment_dir(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (file, contents) in files {
            fs::write(dir.join(file), contents).unwrap();
        }
        dir
    }

    #[test]
    fn test_collapse_layers_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let dir = fragment_dir(
            temp_dir.path(),
            "layers",
            &[
                ("a.yaml", "beauty: !!set {diffuse, spec}\n"),
                ("b.yml", "beauty: !!set {spec, reflect}\n"),
            ],
        );
        let output = temp_dir.path().join("layers.yaml");

        let config = collapse(&dir, &output).unwrap();
        assert_eq!(config["beauty"], ["diffuse", "reflect", "spec"]);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "beauty:\n    - diffuse\n    - reflect\n    - spec\n"
        );
    }

    #[test]
    fn test_collapse_channels_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let dir = fragment_dir(
            temp_dir.path(),
            "channels",
            &[
                ("01_base.yaml", "rgba: [red, green, blue]\n"),
                ("02_alpha.yaml", "rgba: [alpha]\n"),
            ],
        );
        let output = temp_dir.path().join("channels.yaml");

        let config = collapse(&dir, &output).unwrap();
        assert_eq!(config["rgba"], ["red", "green", "blue", "alpha"]);
    }

    #[test]
    fn test_collapse_skips_placeholders() {
        let temp_dir = TempDir::new().unwrap();
        let dir = fragment_dir(
            temp_dir.path(),
            "layers",
            &[("a.yaml", ""), ("b.yaml", "depth: [z]\n")],
        );
        let output = temp_dir.path().join("out.yaml");

        let report = collapse_with(&dir, &output, &CollapseOptions::default()).unwrap();
        assert_eq!(report.fragments, [dir.join("b.yaml")]);
        assert_eq!(report.skipped, [dir.join("a.yaml")]);
        assert_eq!(report.policy, MergePolicy::Sorted);
        assert!(report.rendered.is_none());
    }

    #[test]
    fn test_collapse_ignores_destination_inside_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = fragment_dir(temp_dir.path(), "channels", &[("a.yaml", "rgb: [r]\n")]);
        let output = dir.join("zz_collapsed.yaml");

        collapse(&dir, &output).unwrap();
        let again = collapse(&dir, &output).unwrap();
        assert_eq!(again["rgb"], ["r"]);
    }

    #[test]
    fn test_collapse_dry_run_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let dir = fragment_dir(temp_dir.path(), "channels", &[("a.yaml", "rgb: [r, g]\n")]);
        let output = temp_dir.path().join("channels.yaml");

        let report = collapse_with(
            &dir,
            &output,
            &CollapseOptions::default().with_dry_run(true),
        )
        .unwrap();

        assert!(!output.exists());
        assert_eq!(report.rendered.as_deref(), Some("rgb:\n    - r\n    - g\n"));
    }

    #[test]
    fn test_collapse_forced_policy() {
        let temp_dir = TempDir::new().unwrap();
        let dir = fragment_dir(temp_dir.path(), "layers", &[("a.yaml", "xyz: [z, x, y]\n")]);
        let output = temp_dir.path().join("out.yaml");

        let report = collapse_with(
            &dir,
            &output,
            &CollapseOptions::default().with_policy(MergePolicy::PreserveOrder),
        )
        .unwrap();
        assert_eq!(report.config["xyz"], ["z", "x", "y"]);
    }

    #[test]
    fn test_collapse_format_error_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = fragment_dir(temp_dir.path(), "layers", &[("bad.yaml", "beauty: diffuse\n")]);
        let output = temp_dir.path().join("out.yaml");

        let err = collapse(&dir, &output).unwrap_err();
        match err {
            Error::ConfigFormat { path, .. } => assert_eq!(path, dir.join("bad.yaml")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_collapse_kind_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let dir = fragment_dir(
            temp_dir.path(),
            "layers",
            &[("a.yaml", "beauty: !!set {diffuse}\n"), ("b.yaml", "beauty: [spec]\n")],
        );
        let output = temp_dir.path().join("out.yaml");

        let err = collapse(&dir, &output).unwrap_err();
        assert!(matches!(err, Error::ConfigMerge { .. }));
    }

    #[test]
    fn test_collapse_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = fragment_dir(temp_dir.path(), "layers", &[]);
        let output = temp_dir.path().join("out.yaml");

        let config = collapse(&dir, &output).unwrap();
        assert!(config.is_empty());
        assert_eq!(fs::read_to_string(&output).unwrap(), "{}\n");
    }
}
