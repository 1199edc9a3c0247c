//! Normalised set of relative paths that a sync pass must leave untouched.

use std::collections::BTreeSet;
use std::path::{Component, Path};

/// Relative paths (always `/`-separated) skipped during synchronisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
  entries: BTreeSet<String>,
}

impl ExclusionSet {
  /// Create an empty exclusion set.
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a raw entry. Returns `false` when the entry was empty after normalisation or
  /// already present.
  pub fn insert(&mut self, raw: &str) -> bool {
    match normalise_entry(raw) {
      Some(entry) => self.entries.insert(entry),
      None => false,
    }
  }

  /// Merge every entry of `other` into this set.
  pub fn extend_from(&mut self, other: &ExclusionSet) {
    self.entries.extend(other.entries.iter().cloned());
  }

  /// Exact membership test on a relative path string.
  pub fn contains(&self, relative: &str) -> bool {
    normalise_entry(relative).is_some_and(|entry| self.entries.contains(&entry))
  }

  /// Membership test on a path relative to the source root.
  pub fn contains_path(&self, relative: &Path) -> bool {
    self.entries.contains(&relative_path_key(relative))
  }

  /// Number of distinct entries.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when nothing is excluded.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate over the normalised entries in sorted order.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(String::as_str)
  }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut set = Self::new();
    for value in iter {
      set.insert(value.as_ref());
    }
    set
  }
}

/// Render a relative path as the `/`-separated key used for exclusion lookups.
pub fn relative_path_key(relative: &Path) -> String {
  relative
    .components()
    .filter_map(|component| match component {
      Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
      _ => None,
    })
    .collect::<Vec<_>>()
    .join("/")
}

/// Trim whitespace, unify separators and strip `./` and surrounding slashes.
fn normalise_entry(value: &str) -> Option<String> {
  let mut entry = value.trim().replace('\\', "/");
  while let Some(rest) = entry.strip_prefix("./") {
    entry = rest.to_string();
  }
  let entry = entry.trim_matches('/');
  (!entry.is_empty()).then(|| entry.to_string())
}
