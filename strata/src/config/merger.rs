//! Fragment merging.
//!
//! Fragments are folded in discovery order. Sets are unioned, lists are
//! concatenated, and the merge policy decides the final ordering of every
//! value.

use crate::config::schema::{CollapsedConfig, Collection, Fragment, MergePolicy};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Accumulates fragments into one mapping.
///
/// # Examples
///
/// ```
/// use strata::config::{Collection, ConfigMerger, Fragment, MergePolicy};
///
/// let a = Fragment::new("a.yaml").with("beauty", Collection::set(["diffuse", "spec"]));
/// let b = Fragment::new("b.yaml").with("beauty", Collection::set(["spec", "reflect"]));
///
/// let merged = ConfigMerger::merge(vec![a, b], MergePolicy::Sorted).unwrap();
/// assert_eq!(merged["beauty"], ["diffuse", "reflect", "spec"]);
/// ```
#[derive(Debug, Default)]
pub struct ConfigMerger {
    accumulated: BTreeMap<String, Collection>,
}

impl ConfigMerger {
    /// Creates an empty merger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge fragments, in order, into a collapsed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigMerge`] if a key is a set in one fragment and a
    /// list in another.
    pub fn merge<I>(fragments: I, policy: MergePolicy) -> Result<CollapsedConfig>
    where
        I: IntoIterator<Item = Fragment>,
    {
        let mut merger = Self::new();
        for fragment in fragments {
            merger.merge_fragment(fragment)?;
        }
        Ok(merger.finish(policy))
    }

    /// Fold one fragment into the accumulation.
    ///
    /// # Merging Rules
    ///
    /// - New key: stored as authored
    /// - Set onto set: union, first-seen order kept
    /// - List onto list: concatenation, duplicates kept
    /// - Set onto list or list onto set: rejected
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigMerge`] on a kind mismatch. Keys merged before
    /// the conflicting one stay merged.
    pub fn merge_fragment(&mut self, fragment: Fragment) -> Result<()> {
        let Fragment { path, entries } = fragment;
        for (key, incoming) in entries {
            match self.accumulated.get_mut(&key) {
                Some(existing) => {
                    let existing_kind = existing.kind();
                    existing.absorb(incoming).map_err(|incoming| Error::ConfigMerge {
                        key: key.clone(),
                        existing: existing_kind,
                        incoming,
                        path: path.clone(),
                    })?;
                }
                None => {
                    self.accumulated.insert(key, incoming);
                }
            }
        }
        Ok(())
    }

    /// Number of keys accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accumulated.len()
    }

    /// Returns true if nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    /// Apply the merge policy and produce the final mapping.
    ///
    /// Sorting applies to every value whatever its authored kind, so list
    /// ordering is lost under [`MergePolicy::Sorted`].
    #[must_use]
    pub fn finish(self, policy: MergePolicy) -> CollapsedConfig {
        self.accumulated
            .into_iter()
            .map(|(key, collection)| {
                let mut items = collection.into_items();
                if policy.sorts() {
                    items.sort();
                }
                (key, items)
            })
            .collect()
    }
}
