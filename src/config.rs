//! Project configuration loader describing where bundle files land in an application.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

/// Configuration file names searched for in the project root, in priority order.
pub const CONFIG_FILE_CANDIDATES: &[&str] = &[
  "pwnstyles.config.json",
  "pwnstyles.config.yml",
  "pwnstyles.config.yaml",
];

/// Environment variable naming the runtime environment (`development`, `production`, ...).
pub const ENVIRONMENT_VAR: &str = "PWNSTYLES_ENV";

/// Environment assumed when neither the variable nor the config file names one.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Directory layout of the consuming application, relative to its root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
  /// Bundle tree to install from. Relative paths resolve against the project root.
  pub bundle_root: Option<PathBuf>,
  /// Destination of the bundled stylesheets.
  pub stylesheets_dir: String,
  /// The application's own stylesheet directory, compiled alongside the bundle.
  pub app_stylesheets_dir: String,
  /// Destination of the bundled javascripts.
  pub javascripts_dir: String,
  /// Destination of the bundled layouts.
  pub layouts_dir: String,
  /// Destination of the bundled static assets.
  pub assets_dir: String,
  /// Stylesheet paths (relative to the bundle's stylesheet root) that `update` never
  /// overwrites.
  pub update_exclusions: Vec<String>,
  /// Runtime environment override.
  pub environment: Option<String>,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      bundle_root: None,
      stylesheets_dir: "public/pwnstyles/stylesheets".into(),
      app_stylesheets_dir: "public/stylesheets".into(),
      javascripts_dir: "public/javascripts".into(),
      layouts_dir: "app/views/layouts".into(),
      assets_dir: "app/assets".into(),
      update_exclusions: vec!["scss/vars/_app.scss".into()],
      environment: None,
    }
  }
}

/// Errors that can occur while loading a configuration file that exists.
#[derive(Debug)]
pub enum ConfigError {
  /// Failed to read the configuration file from disk.
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse a JSON configuration file.
  Json {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// Failed to parse a YAML configuration file.
  Yaml {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_yaml::Error,
  },
}

impl ProjectConfig {
  /// Load the first configuration file found in `project_root`, or defaults when none
  /// exists.
  pub fn discover(project_root: &Path) -> Result<Self, ConfigError> {
    for name in CONFIG_FILE_CANDIDATES {
      let candidate = project_root.join(name);
      if candidate.is_file() {
        debug!(path = %candidate.display(), "loading project configuration");
        return Self::from_path(&candidate);
      }
    }
    debug!(root = %project_root.display(), "no project configuration found, using defaults");
    Ok(Self::default())
  }

  /// Read configuration from a specific file; the extension selects JSON or YAML.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));

    if is_yaml {
      serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
      })
    } else {
      serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
      })
    }
  }

  /// Resolve the bundle root, falling back to the bundle shipped with this crate.
  pub fn bundle_root_path(&self, project_root: &Path) -> PathBuf {
    match &self.bundle_root {
      Some(path) if path.is_absolute() => path.clone(),
      Some(path) => project_root.join(path),
      None => default_bundle_root(),
    }
  }

  /// Effective runtime environment: `PWNSTYLES_ENV` wins over the config file.
  pub fn environment(&self) -> String {
    resolve_environment(std::env::var(ENVIRONMENT_VAR).ok(), self.environment.as_deref())
  }
}

/// Bundle tree shipped next to this crate's manifest.
pub fn default_bundle_root() -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR")).join("bundle")
}

fn resolve_environment(from_env: Option<String>, configured: Option<&str>) -> String {
  from_env
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
    .or_else(|| configured.map(str::to_string))
    .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

impl std::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Io { path, source } => {
        write!(f, "failed to read {}: {}", path.display(), source)
      }
      Self::Json { path, source } => {
        write!(f, "failed to parse {}: {}", path.display(), source)
      }
      Self::Yaml { path, source } => {
        write!(f, "failed to parse {}: {}", path.display(), source)
      }
    }
  }
}

impl std::error::Error for ConfigError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io { source, .. } => Some(source),
      Self::Json { source, .. } => Some(source),
      Self::Yaml { source, .. } => Some(source),
    }
  }
}
