//! Canonical serialization of collapsed configurations.
//!
//! Output is block YAML with a four space indent and one item per line, so
//! a change to a single item shows up as a single-line diff:
//!
//! ```yaml
//! beauty:
//!     - diffuse
//!     - spec
//! empty: []
//! ```

use crate::config::schema::CollapsedConfig;
use crate::error::{Error, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const INDENT: &str = "    ";

// Longest key a YAML parser accepts in the implicit `key:` form.
const MAX_IMPLICIT_KEY: usize = 1024;

/// Writes collapsed configurations.
///
/// # Examples
///
/// ```
/// use strata::config::{CollapsedConfig, ConfigSerializer};
///
/// let mut config = CollapsedConfig::new();
/// config.insert("beauty".to_string(), vec!["diffuse".to_string(), "spec".to_string()]);
///
/// let text = ConfigSerializer::to_string(&config).unwrap();
/// assert_eq!(text, "beauty:\n    - diffuse\n    - spec\n");
/// ```
pub struct ConfigSerializer;

impl ConfigSerializer {
    /// Render a configuration in canonical form.
    ///
    /// Keys are written in the configuration's own iteration order. Keys too
    /// long for the implicit `key:` form are written as explicit `? key`
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns an error if a key or item cannot be rendered as a YAML scalar.
    pub fn to_string(config: &CollapsedConfig) -> Result<String> {
        if config.is_empty() {
            return Ok("{}\n".to_string());
        }

        let mut out = String::new();
        for (key, items) in config {
            let key = render_scalar(key)?;
            if key.len() >= MAX_IMPLICIT_KEY {
                let _ = writeln!(out, "? {key}");
            } else {
                out.push_str(&key);
            }
            out.push(':');
            if items.is_empty() {
                out.push_str(" []\n");
                continue;
            }
            out.push('\n');
            for item in items {
                let _ = writeln!(out, "{INDENT}- {}", render_scalar(item)?);
            }
        }
        Ok(out)
    }

    /// Render `config` and write it to `path`, replacing any existing file.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] if the file cannot be written.
    pub fn write(config: &CollapsedConfig, path: &Path) -> Result<()> {
        let text = Self::to_string(config)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::ConfigWrite {
                path: path.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, text).map_err(|source| Error::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("wrote {} keys to {}", config.len(), path.display());
        Ok(())
    }
}

/// Render one string as a single-line YAML scalar.
///
/// `serde_yaml` decides when quoting is needed. Strings it would emit as a
/// multi-line block scalar are written double-quoted instead.
fn render_scalar(value: &str) -> Result<String> {
    let rendered = serde_yaml::to_string(value)?;
    let rendered = rendered.strip_suffix('\n').unwrap_or(&rendered);
    if rendered.contains('\n') {
        return Ok(double_quoted(value));
    }
    Ok(rendered.to_string())
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
