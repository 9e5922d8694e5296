//! Configuration data model.
//!
//! A [`Fragment`] maps category keys to a [`Collection`] whose
//! [`CollectionKind`] is fixed by how the file was authored. Folding
//! fragments together produces a [`CollapsedConfig`].

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// The final, merged configuration: each key maps to its list of items.
///
/// Keys iterate in lexicographic order, which is also the order the
/// serializer writes them in.
pub type CollapsedConfig = BTreeMap<String, Vec<String>>;

/// How a collection was authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Unordered, deduplicated (`!!set` in YAML).
    Set,
    /// Ordered, duplicates allowed (a YAML sequence).
    List,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => write!(f, "set"),
            Self::List => write!(f, "list"),
        }
    }
}

/// A homogeneous collection of string items.
///
/// Set collections never hold duplicates and remember the order in which
/// items were first seen, so output stays stable between runs.
///
/// # Examples
///
/// ```
/// use strata::config::{Collection, CollectionKind};
///
/// let set = Collection::set(["spec", "diffuse", "spec"]);
/// assert_eq!(set.kind(), CollectionKind::Set);
/// assert_eq!(set.items(), ["spec", "diffuse"]);
///
/// let list = Collection::list(["spec", "diffuse", "spec"]);
/// assert_eq!(list.items().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    kind: CollectionKind,
    items: Vec<String>,
    // Membership index for sets; always empty for lists.
    seen: HashSet<String>,
}

impl Collection {
    /// Creates a set collection, dropping repeated items.
    pub fn set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collection = Self {
            kind: CollectionKind::Set,
            items: Vec::new(),
            seen: HashSet::new(),
        };
        for item in items {
            collection.insert_unique(item.into());
        }
        collection
    }

    /// Creates a list collection, keeping items exactly as given.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: CollectionKind::List,
            items: items.into_iter().map(Into::into).collect(),
            seen: HashSet::new(),
        }
    }

    /// Returns the authored kind.
    #[must_use]
    pub const fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Returns the items in accumulated order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Consumes the collection, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<String> {
        self.items
    }

    /// Returns true if the collection has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `other`'s items to this collection.
    ///
    /// Sets take the union, lists concatenate. Both sides must share a kind;
    /// on mismatch nothing is changed and the incoming kind is returned.
    pub(crate) fn absorb(&mut self, other: Self) -> std::result::Result<(), CollectionKind> {
        if self.kind != other.kind {
            return Err(other.kind);
        }
        match self.kind {
            CollectionKind::Set => {
                for item in other.items {
                    self.insert_unique(item);
                }
            }
            CollectionKind::List => self.items.extend(other.items),
        }
        Ok(())
    }

    fn insert_unique(&mut self, item: String) {
        if self.seen.insert(item.clone()) {
            self.items.push(item);
        }
    }
}

/// One parsed fragment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// File the fragment was loaded from.
    pub path: PathBuf,
    /// Category key to authored collection.
    pub entries: BTreeMap<String, Collection>,
}

impl Fragment {
    /// Creates an empty fragment attributed to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Adds an entry, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, collection: Collection) -> Self {
        self.entries.insert(key.into(), collection);
        self
    }

    /// Converts the fragment to a collapsed config without merging anything.
    ///
    /// Every collection kind becomes a plain item list in its stored order.
    #[must_use]
    pub fn into_collapsed(self) -> CollapsedConfig {
        self.entries
            .into_iter()
            .map(|(key, collection)| (key, collection.into_items()))
            .collect()
    }
}

/// Final ordering applied to every merged collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Sort every value lexicographically.
    Sorted,
    /// Keep encounter order.
    PreserveOrder,
}

impl MergePolicy {
    /// Derives the policy from a fragment directory's name.
    ///
    /// Layer directories carry no meaningful order and are sorted; anything
    /// else (channel directories in particular) keeps its authored order.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata::config::MergePolicy;
    /// use std::path::Path;
    ///
    /// assert_eq!(MergePolicy::for_directory(Path::new("/configs/layers")), MergePolicy::Sorted);
    /// assert_eq!(
    ///     MergePolicy::for_directory(Path::new("/configs/channels")),
    ///     MergePolicy::PreserveOrder
    /// );
    /// ```
    #[must_use]
    pub fn for_directory(dir: &Path) -> Self {
        let sorts = dir
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with("layers"));
        if sorts {
            Self::Sorted
        } else {
            Self::PreserveOrder
        }
    }

    /// Returns true when values are sorted.
    #[must_use]
    pub const fn sorts(self) -> bool {
        matches!(self, Self::Sorted)
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sorted => write!(f, "sorted"),
            Self::PreserveOrder => write!(f, "preserve-order"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_deduplicates_first_seen() {
        let set = Collection::set(["b", "a", "b", "c", "a"]);
        assert_eq!(set.items(), ["b", "a", "c"]);
    }

    #[test]
    fn test_large_set_keeps_first_seen_order() {
        let items: Vec<String> = (0..60_000).map(|i| format!("item{}", i % 20_000)).collect();
        let mut set = Collection::set(items);
        assert_eq!(set.items().len(), 20_000);
        assert_eq!(set.items()[0], "item0");
        assert_eq!(set.items()[19_999], "item19999");

        let more: Vec<String> = (10_000..30_000).map(|i| format!("item{i}")).collect();
        set.absorb(Collection::set(more)).unwrap();
        assert_eq!(set.items().len(), 30_000);
        assert_eq!(set.items()[20_000], "item20000");
    }

    #[test]
    fn test_absorb_set_union() {
        let mut set = Collection::set(["diffuse", "spec"]);
        set.absorb(Collection::set(["spec", "reflect"])).unwrap();
        assert_eq!(set.items(), ["diffuse", "spec", "reflect"]);
    }

    #[test]
    fn test_absorb_list_concatenates() {
        let mut list = Collection::list(["r", "g"]);
        list.absorb(Collection::list(["g", "b"])).unwrap();
        assert_eq!(list.items(), ["r", "g", "g", "b"]);
    }

    #[test]
    fn test_absorb_kind_mismatch_leaves_target() {
        let mut set = Collection::set(["a"]);
        let result = set.absorb(Collection::list(["b"]));
        assert_eq!(result, Err(CollectionKind::List));
        assert_eq!(set.items(), ["a"]);
    }

    #[test]
    fn test_policy_for_directory() {
        assert_eq!(
            MergePolicy::for_directory(Path::new("configs/layers")),
            MergePolicy::Sorted
        );
        assert_eq!(
            MergePolicy::for_directory(Path::new("configs/layers/")),
            MergePolicy::Sorted
        );
        assert_eq!(
            MergePolicy::for_directory(Path::new("configs/custom_layers")),
            MergePolicy::Sorted
        );
        assert_eq!(
            MergePolicy::for_directory(Path::new("configs/channels")),
            MergePolicy::PreserveOrder
        );
        assert_eq!(
            MergePolicy::for_directory(Path::new("/")),
            MergePolicy::PreserveOrder
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(CollectionKind::Set.to_string(), "set");
        assert_eq!(CollectionKind::List.to_string(), "list");
        assert_eq!(MergePolicy::PreserveOrder.to_string(), "preserve-order");
    }

    #[test]
    fn test_fragment_into_collapsed() {
        let fragment = Fragment::new("a.yaml")
            .with("beauty", Collection::set(["spec", "diffuse"]))
            .with("rgb", Collection::list(["r", "g", "b"]));
        let collapsed = fragment.into_collapsed();
        assert_eq!(collapsed["beauty"], ["spec", "diffuse"]);
        assert_eq!(collapsed["rgb"], ["r", "g", "b"]);
    }
}
