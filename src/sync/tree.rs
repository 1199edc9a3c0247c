//! Tree traversal and file installation for a single sync pass.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use same_file::is_same_file;
use tracing::{debug, info};

use super::exclusions::{ExclusionSet, relative_path_key};
use super::report::SyncReport;

/// How far below the source root a sync pass descends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncDepth {
  /// Visit every file in the tree.
  #[default]
  Recursive,
  /// Only visit direct children of the source root.
  TopLevel,
}

/// Errors that abort a sync pass.
#[derive(Debug)]
pub enum SyncError {
  /// A source entry could not be listed, inspected or read.
  SourceRead {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: io::Error,
  },
  /// A destination file or directory could not be created or written.
  DestinationWrite {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: io::Error,
  },
}

impl SyncError {
  fn source_read(path: &Path, source: io::Error) -> Self {
    Self::SourceRead {
      path: path.to_path_buf(),
      source,
    }
  }

  fn destination_write(path: &Path, source: io::Error) -> Self {
    Self::DestinationWrite {
      path: path.to_path_buf(),
      source,
    }
  }

  /// Path named by the error.
  pub fn path(&self) -> &Path {
    match self {
      Self::SourceRead { path, .. } | Self::DestinationWrite { path, .. } => path,
    }
  }
}

impl std::fmt::Display for SyncError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::SourceRead { path, source } => {
        write!(f, "failed to read {}: {}", path.display(), source)
      }
      Self::DestinationWrite { path, source } => {
        write!(f, "failed to write {}: {}", path.display(), source)
      }
    }
  }
}

impl std::error::Error for SyncError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::SourceRead { source, .. } => Some(source),
      Self::DestinationWrite { source, .. } => Some(source),
    }
  }
}

/// Copy every non-excluded file under `source_root` to the same relative path under
/// `destination_root`, overwriting existing files.
pub fn sync_tree(
  source_root: &Path,
  destination_root: &Path,
  exclusions: &ExclusionSet,
) -> Result<SyncReport, SyncError> {
  sync_tree_with_depth(source_root, destination_root, exclusions, SyncDepth::Recursive)
}

/// Variant of [`sync_tree`] with an explicit traversal depth.
pub fn sync_tree_with_depth(
  source_root: &Path,
  destination_root: &Path,
  exclusions: &ExclusionSet,
  depth: SyncDepth,
) -> Result<SyncReport, SyncError> {
  let metadata =
    fs::metadata(source_root).map_err(|err| SyncError::source_read(source_root, err))?;
  if !metadata.is_dir() {
    return Err(SyncError::source_read(
      source_root,
      io::Error::new(io::ErrorKind::InvalidInput, "source root is not a directory"),
    ));
  }

  let mut files = Vec::new();
  collect_source_files(source_root, Path::new(""), depth, &mut files)?;

  let mut report = SyncReport::new(source_root.to_path_buf(), destination_root.to_path_buf());
  for relative in files {
    report.scanned += 1;
    let key = relative_path_key(&relative);

    if exclusions.contains_path(&relative) {
      debug!(path = %key, "excluded from sync");
      report.excluded += 1;
      continue;
    }

    let source = source_root.join(&relative);
    let destination = destination_root.join(&relative);
    match install_file(&source, &destination)? {
      InstallOutcome::Copied => {
        debug!(path = %key, destination = %destination.display(), "copied");
        report.copied += 1;
        report.copied_paths.push(key);
      }
      InstallOutcome::SameFile => {
        debug!(path = %key, "source and destination are the same file");
        report.unchanged += 1;
      }
    }
  }

  info!(
    source = %source_root.display(),
    destination = %destination_root.display(),
    copied = report.copied,
    excluded = report.excluded,
    "sync finished"
  );
  Ok(report)
}

/// Gather relative paths of every non-directory entry, sorted by name at each level.
///
/// Entries are classified after following symlinks; linked directories are treated as
/// directories but never descended into.
fn collect_source_files(
  root: &Path,
  relative: &Path,
  depth: SyncDepth,
  files: &mut Vec<PathBuf>,
) -> Result<(), SyncError> {
  let current = root.join(relative);
  let mut entries = Vec::new();
  for entry in fs::read_dir(&current).map_err(|err| SyncError::source_read(&current, err))? {
    let entry = entry.map_err(|err| SyncError::source_read(&current, err))?;
    entries.push(entry);
  }
  entries.sort_by_key(|entry| entry.file_name());

  for entry in entries {
    let path = entry.path();
    let child_relative = relative.join(entry.file_name());
    let file_type = entry
      .file_type()
      .map_err(|err| SyncError::source_read(&path, err))?;

    if file_type.is_dir() {
      if depth == SyncDepth::Recursive {
        collect_source_files(root, &child_relative, depth, files)?;
      }
      continue;
    }

    if file_type.is_symlink() {
      let target = fs::metadata(&path).map_err(|err| SyncError::source_read(&path, err))?;
      if target.is_dir() {
        continue;
      }
    }

    files.push(child_relative);
  }

  Ok(())
}

enum InstallOutcome {
  Copied,
  SameFile,
}

fn install_file(source: &Path, destination: &Path) -> Result<InstallOutcome, SyncError> {
  // An uninspectable destination is left for the write below to report.
  if destination.exists() && is_same_file(source, destination).unwrap_or(false) {
    return Ok(InstallOutcome::SameFile);
  }

  let contents = fs::read(source).map_err(|err| SyncError::source_read(source, err))?;

  if let Some(parent) = destination.parent() {
    fs::create_dir_all(parent).map_err(|err| SyncError::destination_write(parent, err))?;
  }
  fs::write(destination, contents).map_err(|err| SyncError::destination_write(destination, err))?;

  Ok(InstallOutcome::Copied)
}
