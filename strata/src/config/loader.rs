//! Fragment file discovery and loading.
//!
//! This module finds fragment files in a directory and parses each one into
//! a [`Fragment`], rejecting anything that is not a mapping of sets or lists
//! of strings before it can reach the merger.

use crate::config::schema::{Collection, Fragment};
use crate::error::{Error, Result};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions recognized as fragments, compared case-insensitively.
pub const FRAGMENT_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Loads fragment files.
///
/// # Examples
///
/// ```no_run
/// use strata::config::FragmentLoader;
/// use std::path::Path;
///
/// for path in FragmentLoader::discover(Path::new("configs/layers")).unwrap() {
///     if let Some(fragment) = FragmentLoader::load_file(&path).unwrap() {
///         println!("{}: {} keys", path.display(), fragment.entries.len());
///     }
/// }
/// ```
pub struct FragmentLoader;

impl FragmentLoader {
    /// List fragment files directly inside `dir`, sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is not a readable directory.
    pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(Error::InvalidPath {
                path: dir.to_path_buf(),
                reason: "not a directory".into(),
            });
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::InvalidPath {
                path: dir.to_path_buf(),
                reason: format!("Failed to read fragment directory: {e}"),
            })?;
            if entry.file_type().is_file() && Self::is_fragment_path(entry.path()) {
                paths.push(entry.into_path());
            }
        }

        Ok(paths)
    }

    /// Returns true if `path` has a fragment extension.
    #[must_use]
    pub fn is_fragment_path(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                FRAGMENT_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }

    /// Load and check one fragment file.
    ///
    /// Returns `Ok(None)` for placeholder files: empty, comments only, a
    /// bare null document or an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigFormat`] naming the file if it cannot be read,
    /// is not valid YAML, or is not a mapping of sets or lists of strings.
    pub fn load_file(path: &Path) -> Result<Option<Fragment>> {
        let contents = fs::read_to_string(path).map_err(|e| Error::ConfigFormat {
            path: path.to_path_buf(),
            reason: format!("Failed to read fragment: {e}"),
        })?;
        Self::load_str(path, &contents)
    }

    /// Parse fragment text attributed to `path`.
    ///
    /// # Errors
    ///
    /// Same as [`FragmentLoader::load_file`], minus the read failure.
    pub fn load_str(path: &Path, contents: &str) -> Result<Option<Fragment>> {
        if is_placeholder(contents) {
            return Ok(None);
        }

        let contents = localize_set_tags(contents);
        let value: Value = serde_yaml::from_str(&contents).map_err(|e| Error::ConfigFormat {
            path: path.to_path_buf(),
            reason: format!("Invalid YAML: {e}"),
        })?;

        let mapping = match value {
            Value::Null => return Ok(None),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(format_error(
                    path,
                    format!("top level is {}, expected a mapping", describe(&other)),
                ))
            }
        };

        let mut fragment = Fragment::new(path);
        for (key, value) in mapping {
            let key = match key {
                Value::String(key) => key,
                other => {
                    return Err(format_error(
                        path,
                        format!("key {} is not a string", describe(&other)),
                    ))
                }
            };
            let collection = collection_from_value(path, &key, value)?;
            fragment.entries.insert(key, collection);
        }

        if fragment.entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(fragment))
    }
}

/// Long form of the `!!set` tag.
const CORE_SET_TAG: &str = "tag:yaml.org,2002:set";

/// `serde_yaml` drops `!!` handle tags from mappings, so a `!!set` tag right
/// after a top-level key is rewritten to the local `!set` tag before parsing.
fn localize_set_tags(contents: &str) -> Cow<'_, str> {
    if !contents.contains("!!set") {
        return Cow::Borrowed(contents);
    }

    let mut out = String::with_capacity(contents.len());
    for line in contents.split_inclusive('\n') {
        match set_tag_offset(line) {
            // Drop one '!' of the handle.
            Some(offset) => {
                out.push_str(&line[..offset]);
                out.push_str(&line[offset + 1..]);
            }
            None => out.push_str(line),
        }
    }
    Cow::Owned(out)
}

/// Byte offset of a `!!set` tag that is the value of a top-level key.
fn set_tag_offset(line: &str) -> Option<usize> {
    let value = &line[top_level_value_start(line)?..];
    let tagged = value.trim_start_matches([' ', '\t']);
    let after = tagged.strip_prefix("!!set")?;
    if !(after.is_empty() || after.starts_with(char::is_whitespace)) {
        return None;
    }
    Some(line.len() - tagged.len())
}

/// Byte offset just past the `:` that ends a top-level key on `line`.
fn top_level_value_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let key_end = match *bytes.first()? {
        // Value line of an explicit `? key`.
        b':' => 0,
        b'"' => closing_double_quote(bytes)? + 1,
        b'\'' => closing_single_quote(bytes)? + 1,
        b' ' | b'\t' | b'\r' | b'\n' | b'#' | b'?' | b'{' | b'[' | b'!' | b'&' | b'*' => {
            return None
        }
        b'-' if bytes.get(1).map_or(true, u8::is_ascii_whitespace) => return None,
        _ => {
            return bytes
                .windows(2)
                .position(|pair| pair[0] == b':' && (pair[1] == b' ' || pair[1] == b'\t'))
                .map(|colon| colon + 1)
        }
    };

    let rest = line[key_end..].trim_start_matches([' ', '\t']);
    let rest = rest.strip_prefix(':')?;
    Some(line.len() - rest.len())
}

fn closing_double_quote(bytes: &[u8]) -> Option<usize> {
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn closing_single_quote(bytes: &[u8]) -> Option<usize> {
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

fn is_placeholder(contents: &str) -> bool {
    contents.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

fn collection_from_value(path: &Path, key: &str, value: Value) -> Result<Collection> {
    match value {
        Value::Sequence(items) => {
            let mut strings = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => strings.push(s),
                    other => {
                        return Err(format_error(
                            path,
                            format!("list '{key}' contains {}, expected strings", describe(&other)),
                        ))
                    }
                }
            }
            Ok(Collection::list(strings))
        }
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            let is_set = tag == Tag::new("set") || tag == Tag::new(CORE_SET_TAG);
            match value {
                Value::Mapping(members) if is_set => set_from_mapping(path, key, members),
                _ => Err(format_error(
                    path,
                    format!("value of '{key}' has unsupported tag {tag}"),
                )),
            }
        }
        Value::Mapping(_) => Err(format_error(
            path,
            format!(
                "value of '{key}' is a mapping without a !!set tag; list items need '- ' markers"
            ),
        )),
        other => Err(format_error(
            path,
            format!("value of '{key}' is {}, expected a set or list", describe(&other)),
        )),
    }
}

fn set_from_mapping(path: &Path, key: &str, members: Mapping) -> Result<Collection> {
    let mut items = Vec::with_capacity(members.len());
    for (member, value) in members {
        if !value.is_null() {
            return Err(format_error(
                path,
                format!("set '{key}' has a member with a value"),
            ));
        }
        match member {
            Value::String(s) => items.push(s),
            other => {
                return Err(format_error(
                    path,
                    format!("set '{key}' contains {}, expected strings", describe(&other)),
                ))
            }
        }
    }
    Ok(Collection::set(items))
}

fn format_error(path: &Path, reason: String) -> Error {
    Error::ConfigFormat {
        path: path.to_path_buf(),
        reason,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
