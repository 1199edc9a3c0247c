//! Resolved paths for one consuming application.

use std::path::{Path, PathBuf};

use crate::config::{ConfigError, ProjectConfig};
use crate::sass::TemplateLocation;

/// Directory inside the bundle holding stylesheets (SCSS sources under `scss/`).
pub const BUNDLE_STYLESHEETS_DIR: &str = "public/stylesheets";
/// Directory inside the bundle holding javascripts.
pub const BUNDLE_JAVASCRIPTS_DIR: &str = "public/javascripts";
/// Directory inside the bundle holding view layouts.
pub const BUNDLE_LAYOUTS_DIR: &str = "layouts";
/// Directory inside the bundle holding static assets.
pub const BUNDLE_ASSETS_DIR: &str = "assets";
/// Subdirectory of a stylesheet directory containing SCSS templates.
pub const SCSS_TEMPLATE_DIR: &str = "scss";

/// Application root, bundle root and the configuration that relates them.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
  root: PathBuf,
  bundle_root: PathBuf,
  config: ProjectConfig,
}

impl ProjectLayout {
  /// Build a layout from an explicit configuration.
  pub fn new(root: impl Into<PathBuf>, config: ProjectConfig) -> Self {
    let root = root.into();
    let bundle_root = config.bundle_root_path(&root);
    Self {
      root,
      bundle_root,
      config,
    }
  }

  /// Discover the configuration file in `root` and build a layout from it.
  pub fn discover(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let root = root.into();
    let config = ProjectConfig::discover(&root)?;
    Ok(Self::new(root, config))
  }

  /// Replace the bundle root, e.g. from a command-line override.
  pub fn with_bundle_root(mut self, bundle_root: impl Into<PathBuf>) -> Self {
    let bundle_root = bundle_root.into();
    self.bundle_root = if bundle_root.is_absolute() {
      bundle_root
    } else {
      self.root.join(bundle_root)
    };
    self
  }

  /// Application root directory.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Bundle tree the generators copy from.
  pub fn bundle_root(&self) -> &Path {
    &self.bundle_root
  }

  /// Loaded configuration.
  pub fn config(&self) -> &ProjectConfig {
    &self.config
  }

  /// Absolute path of a bundle subdirectory.
  pub fn bundle_dir(&self, relative: &str) -> PathBuf {
    self.bundle_root.join(relative)
  }

  /// Absolute path of a directory inside the application.
  pub fn project_dir(&self, relative: impl AsRef<Path>) -> PathBuf {
    self.root.join(relative)
  }

  /// SCSS template locations compiled for this application: the installed bundle
  /// stylesheets first, then the application's own stylesheets.
  pub fn template_locations(&self) -> Vec<TemplateLocation> {
    [&self.config.stylesheets_dir, &self.config.app_stylesheets_dir]
      .into_iter()
      .map(|dir| {
        let css_dir = self.project_dir(dir);
        TemplateLocation::new(css_dir.join(SCSS_TEMPLATE_DIR), css_dir)
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn registers_bundle_and_app_template_locations() {
    let layout = ProjectLayout::new("/app", ProjectConfig::default());
    let locations = layout.template_locations();

    assert_eq!(locations.len(), 2);
    assert_eq!(
      locations[0].template_dir,
      PathBuf::from("/app/public/pwnstyles/stylesheets/scss")
    );
    assert_eq!(locations[0].css_dir, PathBuf::from("/app/public/pwnstyles/stylesheets"));
    assert_eq!(locations[1].template_dir, PathBuf::from("/app/public/stylesheets/scss"));
    assert_eq!(locations[1].css_dir, PathBuf::from("/app/public/stylesheets"));
  }

  #[test]
  fn bundle_root_override_resolves_against_project() {
    let layout = ProjectLayout::new("/app", ProjectConfig::default()).with_bundle_root("vendor/b");
    assert_eq!(layout.bundle_root(), Path::new("/app/vendor/b"));
    assert_eq!(
      layout.bundle_dir(BUNDLE_LAYOUTS_DIR),
      PathBuf::from("/app/vendor/b/layouts")
    );
  }
}
