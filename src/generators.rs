//! Generator commands that install the bundle into an application.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ProjectConfig;
use crate::project::{
  BUNDLE_ASSETS_DIR, BUNDLE_JAVASCRIPTS_DIR, BUNDLE_LAYOUTS_DIR, BUNDLE_STYLESHEETS_DIR,
  ProjectLayout,
};
use crate::sync::{ExclusionSet, SyncDepth, SyncReport, sync_tree_with_depth};

/// The generators an application can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
  /// First-time setup: stylesheets, javascripts and layouts, overwriting everything.
  Install,
  /// Refresh stylesheets and javascripts, keeping customised files.
  Update,
  /// Layouts plus the static asset tree.
  All,
}

impl fmt::Display for GeneratorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Install => "install",
      Self::Update => "update",
      Self::All => "all",
    };
    f.write_str(name)
  }
}

/// One bundle directory copied into the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStep {
  /// Directory inside the bundle.
  pub bundle_dir: &'static str,
  /// Destination relative to the application root.
  pub destination: PathBuf,
  /// Paths (relative to `bundle_dir`) left untouched.
  pub exclusions: ExclusionSet,
  /// Traversal depth.
  pub depth: SyncDepth,
}

/// Ordered copy plan for one generator.
#[derive(Debug, Clone)]
pub struct Generator {
  kind: GeneratorKind,
  steps: Vec<CopyStep>,
}

impl Generator {
  /// Build the copy plan for `kind`. `extra_exclusions` are merged into every step.
  pub fn plan(
    kind: GeneratorKind,
    config: &ProjectConfig,
    extra_exclusions: &ExclusionSet,
  ) -> Self {
    let with_extra = |base: ExclusionSet| {
      let mut set = base;
      set.extend_from(extra_exclusions);
      set
    };

    let static_assets = |exclusions: ExclusionSet| {
      vec![
        CopyStep {
          bundle_dir: BUNDLE_STYLESHEETS_DIR,
          destination: PathBuf::from(&config.stylesheets_dir),
          exclusions: exclusions.clone(),
          depth: SyncDepth::Recursive,
        },
        CopyStep {
          bundle_dir: BUNDLE_JAVASCRIPTS_DIR,
          destination: PathBuf::from(&config.javascripts_dir),
          exclusions,
          depth: SyncDepth::Recursive,
        },
      ]
    };

    let layouts = CopyStep {
      bundle_dir: BUNDLE_LAYOUTS_DIR,
      destination: PathBuf::from(&config.layouts_dir),
      exclusions: with_extra(ExclusionSet::new()),
      depth: SyncDepth::TopLevel,
    };

    let steps = match kind {
      GeneratorKind::Update => {
        static_assets(with_extra(config.update_exclusions.iter().collect()))
      }
      GeneratorKind::Install => {
        let mut steps = static_assets(with_extra(ExclusionSet::new()));
        steps.push(layouts);
        steps
      }
      GeneratorKind::All => vec![layouts, CopyStep {
        bundle_dir: BUNDLE_ASSETS_DIR,
        destination: PathBuf::from(&config.assets_dir),
        exclusions: with_extra(ExclusionSet::new()),
        depth: SyncDepth::Recursive,
      }],
    };

    Self { kind, steps }
  }

  /// Which generator this plan belongs to.
  pub fn kind(&self) -> GeneratorKind {
    self.kind
  }

  /// Planned steps in execution order.
  pub fn steps(&self) -> &[CopyStep] {
    &self.steps
  }

  /// Execute every step in order, stopping at the first failure.
  pub fn run(&self, layout: &ProjectLayout) -> Result<Vec<SyncReport>> {
    let mut reports = Vec::with_capacity(self.steps.len());
    for step in &self.steps {
      let source = layout.bundle_dir(step.bundle_dir);
      let destination = layout.project_dir(&step.destination);
      let report = sync_tree_with_depth(&source, &destination, &step.exclusions, step.depth)
        .with_context(|| {
          format!("`{}` generator failed copying {}", self.kind, step.bundle_dir)
        })?;
      reports.push(report);
    }

    info!(
      generator = %self.kind,
      copied = reports.iter().map(|report| report.copied).sum::<usize>(),
      "generator finished"
    );
    Ok(reports)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::path::Path;
  use tempfile::tempdir;

  fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
  }

  fn fixture_bundle(root: &Path) {
    write(root, "public/stylesheets/scss/pwnstyles.scss", "@import 'vars/app';");
    write(root, "public/stylesheets/scss/vars/_app.scss", "$brand: red;");
    write(root, "public/javascripts/pwnstyles.js", "// js");
    write(root, "layouts/application.html.erb", "<html></html>");
    write(root, "layouts/nested/ignored.html.erb", "<p></p>");
    write(root, "assets/images/.gitkeep", "");
    write(root, "assets/stylesheets/app.css", "body {}");
  }

  fn layout(temp: &Path) -> ProjectLayout {
    let bundle = temp.join("bundle");
    fixture_bundle(&bundle);
    ProjectLayout::new(temp.join("app"), ProjectConfig::default()).with_bundle_root(bundle)
  }

  #[test]
  fn update_plan_carries_configured_exclusions() {
    let generator = Generator::plan(
      GeneratorKind::Update,
      &ProjectConfig::default(),
      &["custom.css"].into_iter().collect(),
    );

    assert_eq!(generator.steps().len(), 2);
    for step in generator.steps() {
      assert!(step.exclusions.contains("scss/vars/_app.scss"));
      assert!(step.exclusions.contains("custom.css"));
    }
  }

  #[test]
  fn update_keeps_customised_app_variables() -> Result<()> {
    let temp = tempdir()?;
    let layout = layout(temp.path());
    let vars = layout.project_dir("public/pwnstyles/stylesheets/scss/vars/_app.scss");
    write(layout.root(), "public/pwnstyles/stylesheets/scss/vars/_app.scss", "$brand: teal;");

    let reports = Generator::plan(GeneratorKind::Update, layout.config(), &ExclusionSet::new())
      .run(&layout)?;

    assert_eq!(fs::read_to_string(&vars)?, "$brand: teal;");
    assert!(
      layout
        .project_dir("public/pwnstyles/stylesheets/scss/pwnstyles.scss")
        .is_file()
    );
    assert!(layout.project_dir("public/javascripts/pwnstyles.js").is_file());
    assert!(!layout.project_dir("app/views/layouts").exists());
    assert_eq!(reports[0].excluded, 1);
    Ok(())
  }

  #[test]
  fn install_overwrites_everything_and_copies_top_level_layouts() -> Result<()> {
    let temp = tempdir()?;
    let layout = layout(temp.path());
    write(layout.root(), "public/pwnstyles/stylesheets/scss/vars/_app.scss", "$brand: teal;");

    let reports = Generator::plan(GeneratorKind::Install, layout.config(), &ExclusionSet::new())
      .run(&layout)?;

    assert_eq!(reports.len(), 3);
    assert_eq!(
      fs::read_to_string(layout.project_dir("public/pwnstyles/stylesheets/scss/vars/_app.scss"))?,
      "$brand: red;"
    );
    assert!(layout.project_dir("app/views/layouts/application.html.erb").is_file());
    assert!(!layout.project_dir("app/views/layouts/nested").exists());
    Ok(())
  }

  #[test]
  fn all_copies_layouts_and_assets_including_dotfiles() -> Result<()> {
    let temp = tempdir()?;
    let layout = layout(temp.path());

    let generator = Generator::plan(GeneratorKind::All, layout.config(), &ExclusionSet::new());
    assert_eq!(generator.kind(), GeneratorKind::All);
    generator.run(&layout)?;

    assert!(layout.project_dir("app/views/layouts/application.html.erb").is_file());
    assert!(layout.project_dir("app/assets/images/.gitkeep").is_file());
    assert!(layout.project_dir("app/assets/stylesheets/app.css").is_file());
    assert!(!layout.project_dir("public/javascripts").exists());
    Ok(())
  }

  #[test]
  fn missing_bundle_directory_fails_with_context() {
    let temp = tempdir().unwrap();
    let layout = ProjectLayout::new(temp.path().join("app"), ProjectConfig::default())
      .with_bundle_root(temp.path().join("empty-bundle"));

    let err = Generator::plan(GeneratorKind::Update, layout.config(), &ExclusionSet::new())
      .run(&layout)
      .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("`update` generator failed copying public/stylesheets"));
    assert!(message.contains("failed to read"));
  }
}
