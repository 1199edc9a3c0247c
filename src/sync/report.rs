//! Outcome of a single sync pass.

use std::fmt;
use std::path::PathBuf;

/// Counters and copied paths collected while synchronising one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
  /// Root the files were read from.
  pub source_root: PathBuf,
  /// Root the files were written under.
  pub destination_root: PathBuf,
  /// Number of non-directory entries visited.
  pub scanned: usize,
  /// Number of files written to the destination.
  pub copied: usize,
  /// Number of files skipped because they were excluded.
  pub excluded: usize,
  /// Number of files skipped because source and destination are the same file.
  pub unchanged: usize,
  /// Relative paths of copied files, `/`-separated, in visit order.
  pub copied_paths: Vec<String>,
}

impl SyncReport {
  pub(crate) fn new(source_root: PathBuf, destination_root: PathBuf) -> Self {
    Self {
      source_root,
      destination_root,
      ..Self::default()
    }
  }
}

impl fmt::Display for SyncReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} -> {}: scanned={} copied={} excluded={} unchanged={}",
      self.source_root.display(),
      self.destination_root.display(),
      self.scanned,
      self.copied,
      self.excluded,
      self.unchanged
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn formats_one_line_summary() {
    let mut report = SyncReport::new(PathBuf::from("src"), PathBuf::from("dst"));
    report.scanned = 3;
    report.copied = 2;
    report.excluded = 1;

    assert_eq!(
      report.to_string(),
      "src -> dst: scanned=3 copied=2 excluded=1 unchanged=0"
    );
  }
}
