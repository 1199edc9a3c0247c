//! Selective directory synchronisation.
//!
//! A sync pass copies every file below a source root to the same relative location
//! under a destination root, skipping files whose relative path is listed in an
//! [`ExclusionSet`]. Directories are only ever created to hold copied files, and
//! rerunning a pass reproduces the same destination tree.

mod exclusions;
mod report;
mod tree;

pub use exclusions::{ExclusionSet, relative_path_key};
pub use report::SyncReport;
pub use tree::{SyncDepth, SyncError, sync_tree, sync_tree_with_depth};
