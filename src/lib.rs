#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod expansions;
pub mod generators;
pub mod project;
pub mod sass;
pub mod sync;

pub use config::ProjectConfig;
pub use expansions::ExpansionRegistry;
pub use generators::{Generator, GeneratorKind};
pub use project::ProjectLayout;
pub use sass::{SassOptions, SassPlugin, TemplateLocation};
pub use sync::{ExclusionSet, SyncDepth, SyncError, SyncReport, sync_tree};

/// Sass registry for `layout`: its template locations compiled with options for the
/// configured environment.
pub fn sass_plugin_for(layout: &ProjectLayout) -> SassPlugin {
  let mut plugin = SassPlugin::new(SassOptions::for_environment(&layout.config().environment()));
  for location in layout.template_locations() {
    plugin.add_template_location(location);
  }
  plugin
}
