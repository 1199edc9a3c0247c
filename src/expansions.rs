//! Named stylesheet expansions rendered as `<link>` tags for application layouts.

use std::collections::BTreeMap;

/// Expansion registered by default, standing for the bundled stylesheet.
pub const DEFAULT_EXPANSION: &str = "pwnstyles";

/// Public path of the bundled stylesheet, without extension.
pub const DEFAULT_STYLESHEET: &str = "/pwnstyles/stylesheets/pwnstyles";

/// Mapping from expansion names to the stylesheet sources they include.
#[derive(Debug, Clone, Default)]
pub struct ExpansionRegistry {
  expansions: BTreeMap<String, Vec<String>>,
}

/// Errors raised while rendering an expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
  /// No expansion is registered under the requested name.
  Unknown(String),
}

impl ExpansionRegistry {
  /// Registry containing only the default `pwnstyles` expansion.
  pub fn with_defaults() -> Self {
    let mut registry = Self::default();
    registry.register(DEFAULT_EXPANSION, [DEFAULT_STYLESHEET]);
    registry
  }

  /// Register `name`, replacing any previous list of sources.
  pub fn register<I, S>(&mut self, name: &str, sources: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self
      .expansions
      .insert(name.to_string(), sources.into_iter().map(Into::into).collect());
  }

  /// Sources registered under `name`.
  pub fn sources(&self, name: &str) -> Option<&[String]> {
    self.expansions.get(name).map(Vec::as_slice)
  }

  /// Registered expansion names, sorted.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.expansions.keys().map(String::as_str)
  }

  /// Render one stylesheet link tag per source, newline separated.
  pub fn render_link_tags(&self, name: &str) -> Result<String, ExpansionError> {
    let sources = self
      .sources(name)
      .ok_or_else(|| ExpansionError::Unknown(name.to_string()))?;

    Ok(
      sources
        .iter()
        .map(|source| stylesheet_link_tag(source))
        .collect::<Vec<_>>()
        .join("\n"),
    )
  }
}

fn stylesheet_link_tag(source: &str) -> String {
  let href = if source.ends_with(".css") {
    source.to_string()
  } else {
    format!("{source}.css")
  };
  format!(r#"<link href="{href}" media="screen" rel="stylesheet" type="text/css" />"#)
}

impl std::fmt::Display for ExpansionError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Unknown(name) => write!(f, "unknown stylesheet expansion `{name}`"),
    }
  }
}

impl std::error::Error for ExpansionError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_expansion_renders_bundled_stylesheet() {
    let registry = ExpansionRegistry::with_defaults();
    assert_eq!(
      registry.render_link_tags("pwnstyles").unwrap(),
      r#"<link href="/pwnstyles/stylesheets/pwnstyles.css" media="screen" rel="stylesheet" type="text/css" />"#
    );
  }

  #[test]
  fn renders_one_tag_per_source() {
    let mut registry = ExpansionRegistry::default();
    registry.register("site", ["/stylesheets/reset.css", "/stylesheets/site"]);

    let tags = registry.render_link_tags("site").unwrap();
    let lines: Vec<&str> = tags.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(r#"href="/stylesheets/reset.css""#));
    assert!(lines[1].contains(r#"href="/stylesheets/site.css""#));
  }

  #[test]
  fn registering_again_replaces_sources() {
    let mut registry = ExpansionRegistry::with_defaults();
    registry.register("pwnstyles", ["/custom"]);
    assert_eq!(registry.sources("pwnstyles").unwrap(), &["/custom".to_string()]);
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["pwnstyles"]);
  }

  #[test]
  fn unknown_expansion_is_an_error() {
    let registry = ExpansionRegistry::with_defaults();
    let err = registry.render_link_tags("missing").unwrap_err();
    assert_eq!(err, ExpansionError::Unknown("missing".into()));
    assert_eq!(err.to_string(), "unknown stylesheet expansion `missing`");
  }
}
