//! Round-trip verification of written configurations.

use crate::config::loader::FragmentLoader;
use crate::config::schema::{CollapsedConfig, Fragment};
use crate::error::{Error, Result};
use std::path::Path;

/// Reloads a written configuration so callers get exactly what is on disk.
///
/// # Examples
///
/// ```no_run
/// use strata::config::{CollapsedConfig, ConfigSerializer, RoundTripVerifier};
/// use std::path::Path;
///
/// let config = CollapsedConfig::new();
/// let path = Path::new("configs/layers.yaml");
/// ConfigSerializer::write(&config, path).unwrap();
/// let reloaded = RoundTripVerifier::verify(path, &config).unwrap();
/// assert_eq!(reloaded, config);
/// ```
pub struct RoundTripVerifier;

impl RoundTripVerifier {
    /// Reload `path` and check it holds `written`.
    ///
    /// The reloaded value, not `written`, is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigRoundTrip`] if the file cannot be reloaded,
    /// reloads to nothing although `written` has keys, or reloads to a
    /// different value.
    pub fn verify(path: &Path, written: &CollapsedConfig) -> Result<CollapsedConfig> {
        let reloaded = FragmentLoader::load_file(path).map_err(|e| Error::ConfigRoundTrip {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let reloaded = match reloaded {
            Some(fragment) => Fragment::into_collapsed(fragment),
            None if written.is_empty() => CollapsedConfig::new(),
            None => {
                return Err(Error::ConfigRoundTrip {
                    path: path.to_path_buf(),
                    reason: "file reloaded as empty".into(),
                })
            }
        };

        if &reloaded != written {
            return Err(Error::ConfigRoundTrip {
                path: path.to_path_buf(),
                reason: "reloaded values differ from the values written".into(),
            });
        }

        Ok(reloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigSerializer;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> CollapsedConfig {
        let mut config = CollapsedConfig::new();
        config.insert(
            "beauty".to_string(),
            vec!["diffuse".to_string(), "spec".to_string()],
        );
        config
    }

    #[test]
    fn test_verify_written_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layers.yaml");
        ConfigSerializer::write(&sample(), &path).unwrap();

        assert_eq!(RoundTripVerifier::verify(&path, &sample()).unwrap(), sample());
    }

    #[test]
    fn test_verify_empty_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layers.yaml");
        ConfigSerializer::write(&CollapsedConfig::new(), &path).unwrap();

        let reloaded = RoundTripVerifier::verify(&path, &CollapsedConfig::new()).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_verify_truncated_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layers.yaml");
        fs::write(&path, "").unwrap();

        let err = RoundTripVerifier::verify(&path, &sample()).unwrap_err();
        assert!(matches!(err, Error::ConfigRoundTrip { .. }));
    }

    #[test]
    fn test_verify_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layers.yaml");
        fs::write(&path, "beauty: diffuse\n").unwrap();

        let err = RoundTripVerifier::verify(&path, &sample()).unwrap_err();
        assert!(matches!(err, Error::ConfigRoundTrip { .. }));
        assert!(format!("{err}").contains("not a mapping of sets or lists"));
    }

    #[test]
    fn test_verify_mismatched_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layers.yaml");
        fs::write(&path, "beauty:\n    - spec\n    - diffuse\n").unwrap();

        let err = RoundTripVerifier::verify(&path, &sample()).unwrap_err();
        assert!(format!("{err}").contains("differ"));
    }

    #[test]
    fn test_verify_missing_file() {
        let err =
            RoundTripVerifier::verify(Path::new("/nonexistent/layers.yaml"), &sample()).unwrap_err();
        assert!(matches!(err, Error::ConfigRoundTrip { .. }));
    }
}
