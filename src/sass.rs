//! SCSS template locations and their compilation into CSS.
//!
//! Each [`TemplateLocation`] pairs a directory of SCSS sources with the directory the
//! compiled stylesheets are written to. Partials (files starting with `_`) are only
//! compiled through the stylesheets that import them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::config::DEFAULT_ENVIRONMENT;
use crate::sync::relative_path_key;

const TEMPLATE_EXTENSIONS: &[&str] = &["scss", "sass"];

/// SCSS source directory and the CSS directory it compiles into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLocation {
  /// Directory scanned for SCSS sources.
  pub template_dir: PathBuf,
  /// Directory receiving compiled CSS.
  pub css_dir: PathBuf,
}

impl TemplateLocation {
  /// Pair a template directory with its output directory.
  pub fn new(template_dir: impl Into<PathBuf>, css_dir: impl Into<PathBuf>) -> Self {
    Self {
      template_dir: template_dir.into(),
      css_dir: css_dir.into(),
    }
  }
}

/// Formatting of compiled CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
  /// One declaration per line, readable output.
  Expanded,
  /// Whitespace stripped.
  Compressed,
}

impl From<OutputStyle> for grass::OutputStyle {
  fn from(style: OutputStyle) -> Self {
    match style {
      OutputStyle::Expanded => grass::OutputStyle::Expanded,
      OutputStyle::Compressed => grass::OutputStyle::Compressed,
    }
  }
}

/// Compilation options shared by every template location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SassOptions {
  /// Output formatting.
  pub style: OutputStyle,
  /// Prefix each compiled stylesheet with a comment naming its source.
  pub debug: bool,
}

impl SassOptions {
  /// Expanded, annotated output in development; compressed output everywhere else.
  pub fn for_environment(environment: &str) -> Self {
    if environment == DEFAULT_ENVIRONMENT {
      Self {
        style: OutputStyle::Expanded,
        debug: true,
      }
    } else {
      Self {
        style: OutputStyle::Compressed,
        debug: false,
      }
    }
  }
}

impl Default for SassOptions {
  fn default() -> Self {
    Self::for_environment(DEFAULT_ENVIRONMENT)
  }
}

/// Registry of template locations plus the options used to compile them.
#[derive(Debug, Clone, Default)]
pub struct SassPlugin {
  locations: Vec<TemplateLocation>,
  options: SassOptions,
}

impl SassPlugin {
  /// Create an empty registry with the given options.
  pub fn new(options: SassOptions) -> Self {
    Self {
      locations: Vec::new(),
      options,
    }
  }

  /// Register a template location. Registering a template directory twice replaces its
  /// output directory and keeps the original position.
  pub fn add_template_location(&mut self, location: TemplateLocation) {
    match self
      .locations
      .iter_mut()
      .find(|existing| existing.template_dir == location.template_dir)
    {
      Some(existing) => existing.css_dir = location.css_dir,
      None => self.locations.push(location),
    }
  }

  /// Registered locations in registration order.
  pub fn locations(&self) -> &[TemplateLocation] {
    &self.locations
  }

  /// Current compilation options.
  pub fn options(&self) -> SassOptions {
    self.options
  }

  /// Replace the compilation options.
  pub fn set_options(&mut self, options: SassOptions) {
    self.options = options;
  }

  /// Compile every non-partial template in every registered location, returning the
  /// written CSS paths.
  pub fn compile_all(&self) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for location in &self.locations {
      if !location.template_dir.is_dir() {
        debug!(
          template_dir = %location.template_dir.display(),
          "template location missing, skipping"
        );
        continue;
      }

      let mut templates = Vec::new();
      collect_templates(&location.template_dir, Path::new(""), &mut templates)?;
      for relative in templates {
        written.push(self.compile_template(location, &relative)?);
      }
    }

    info!(count = written.len(), style = ?self.options.style, "compiled stylesheets");
    Ok(written)
  }

  fn compile_template(&self, location: &TemplateLocation, relative: &Path) -> Result<PathBuf> {
    let source = location.template_dir.join(relative);
    let load_paths = [location.template_dir.clone()];
    let options = grass::Options::default()
      .style(self.options.style.into())
      .load_paths(&load_paths);

    let css = grass::from_path(&source, &options)
      .map_err(|err| anyhow!("failed to compile {}: {}", source.display(), err))?;
    let css = if self.options.debug {
      format!("/* source: {} */\n{}", relative_path_key(relative), css)
    } else {
      css
    };

    let target = location.css_dir.join(relative).with_extension("css");
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&target, css).with_context(|| format!("failed to write {}", target.display()))?;

    debug!(source = %source.display(), target = %target.display(), "compiled stylesheet");
    Ok(target)
  }
}

fn collect_templates(root: &Path, relative: &Path, templates: &mut Vec<PathBuf>) -> Result<()> {
  let current = root.join(relative);
  let mut entries = fs::read_dir(&current)
    .with_context(|| format!("failed to read template directory {}", current.display()))?
    .collect::<std::io::Result<Vec<_>>>()
    .with_context(|| format!("failed to read template directory {}", current.display()))?;
  entries.sort_by_key(|entry| entry.file_name());

  for entry in entries {
    let file_name = entry.file_name();
    let child_relative = relative.join(&file_name);
    let file_type = entry
      .file_type()
      .with_context(|| format!("failed to inspect {}", entry.path().display()))?;
    if file_type.is_dir() {
      collect_templates(root, &child_relative, templates)?;
      continue;
    }

    let name = file_name.to_string_lossy();
    let is_template = Path::new(name.as_ref())
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext));
    if is_template && !name.starts_with('_') {
      templates.push(child_relative);
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
  }

  #[test]
  fn development_is_expanded_and_annotated() {
    let options = SassOptions::for_environment("development");
    assert_eq!(options.style, OutputStyle::Expanded);
    assert!(options.debug);

    let options = SassOptions::for_environment("production");
    assert_eq!(options.style, OutputStyle::Compressed);
    assert!(!options.debug);

    for near_miss in [" development", "Development", "DEVELOPMENT"] {
      assert_eq!(SassOptions::for_environment(near_miss).style, OutputStyle::Compressed);
    }
  }

  #[test]
  fn re_registering_a_template_dir_replaces_its_output() {
    let mut plugin = SassPlugin::default();
    plugin.add_template_location(TemplateLocation::new("a/scss", "a"));
    plugin.add_template_location(TemplateLocation::new("b/scss", "b"));
    plugin.add_template_location(TemplateLocation::new("a/scss", "a/css"));

    assert_eq!(plugin.locations(), &[
      TemplateLocation::new("a/scss", "a/css"),
      TemplateLocation::new("b/scss", "b"),
    ]);
  }

  #[test]
  fn compiles_templates_and_skips_partials() -> Result<()> {
    let temp = tempdir()?;
    let css_dir = temp.path().join("stylesheets");
    let template_dir = css_dir.join("scss");
    write(&template_dir, "vars/_app.scss", "$brand: red;");
    write(&template_dir, "main.scss", "@import 'vars/app';\na { color: $brand; }");
    write(&template_dir, "notes.txt", "not a stylesheet");

    let mut plugin = SassPlugin::new(SassOptions::for_environment("production"));
    plugin.add_template_location(TemplateLocation::new(&template_dir, &css_dir));
    let written = plugin.compile_all()?;

    assert_eq!(written, vec![css_dir.join("main.css")]);
    let css = fs::read_to_string(css_dir.join("main.css"))?;
    assert!(css.contains("a{color:red}"));
    assert!(!css_dir.join("vars").exists());
    Ok(())
  }

  #[test]
  fn debug_output_names_the_source() -> Result<()> {
    let temp = tempdir()?;
    let css_dir = temp.path().join("out");
    let template_dir = temp.path().join("scss");
    write(&template_dir, "layout/grid.scss", "$w: 10px;\n.grid { width: $w; }");

    let mut plugin = SassPlugin::new(SassOptions::for_environment("development"));
    plugin.add_template_location(TemplateLocation::new(&template_dir, &css_dir));
    plugin.compile_all()?;

    let css = fs::read_to_string(css_dir.join("layout/grid.css"))?;
    assert!(css.starts_with("/* source: layout/grid.scss */"));
    assert!(css.contains("width: 10px;"));
    Ok(())
  }

  #[test]
  fn missing_template_dirs_are_skipped() -> Result<()> {
    let temp = tempdir()?;
    let mut plugin = SassPlugin::default();
    plugin.add_template_location(TemplateLocation::new(
      temp.path().join("absent/scss"),
      temp.path().join("absent"),
    ));

    assert!(plugin.compile_all()?.is_empty());
    Ok(())
  }

  #[test]
  fn compile_errors_name_the_file() {
    let temp = tempdir().unwrap();
    let template_dir = temp.path().join("scss");
    write(&template_dir, "broken.scss", "a { color: $undefined; }");

    let mut plugin = SassPlugin::default();
    plugin.add_template_location(TemplateLocation::new(&template_dir, temp.path()));
    let err = plugin.compile_all().unwrap_err();

    assert!(err.to_string().contains("broken.scss"));
  }
}
