use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

pub const DEFAULT_OPERATORS: [&str; 4] = ["Where", "Select", "OrderBy", "Join"];
pub const DEFAULT_REMOTE_PREFIX: &str = "System.Linq.Queryable";
pub const DEFAULT_MAX_TYPE_DEPTH: usize = 64;

/// Which declaring types count as the remote-capable operator overloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteFamily {
  /// Fully-qualified declaring type name starts with this text.
  Prefix(String),
  /// Fully-qualified declaring type name is one of these.
  Types(BTreeSet<String>),
}

impl RemoteFamily {
  pub fn contains(&self, containing_type: &str) -> bool {
    match self {
      RemoteFamily::Prefix(prefix) => containing_type.starts_with(prefix.as_str()),
      RemoteFamily::Types(types) => types.contains(containing_type),
    }
  }
}

impl Default for RemoteFamily {
  fn default() -> Self {
    RemoteFamily::Prefix(DEFAULT_REMOTE_PREFIX.to_string())
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
  /// Operator names matched exactly and case-sensitively against call shapes.
  pub recognized_operators: BTreeSet<String>,
  pub remote_family: RemoteFamily,
  /// Structural depth after which a type is treated as not evaluable.
  pub max_type_depth: usize,
}

impl Default for AnalyzerConfig {
  fn default() -> Self {
    Self {
      recognized_operators: DEFAULT_OPERATORS.iter().map(|s| s.to_string()).collect(),
      remote_family: RemoteFamily::default(),
      max_type_depth: DEFAULT_MAX_TYPE_DEPTH,
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid configuration: {0}")]
  Json(#[from] serde_json::Error),
  #[error("at least one query operator name must be recognized")]
  NoOperators,
  #[error("`{0}` is not a valid operator name")]
  InvalidOperatorName(String),
  #[error("remote family prefix must not be empty")]
  EmptyPrefix,
  #[error("remote family type list must not be empty")]
  NoRemoteTypes,
  #[error("max_type_depth must be at least 1")]
  ZeroDepth,
}

impl AnalyzerConfig {
  /// Parses a JSON config; omitted fields keep their defaults.
  pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
    let config: AnalyzerConfig = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.recognized_operators.is_empty() {
      return Err(ConfigError::NoOperators);
    }
    if let Some(bad) = self
      .recognized_operators
      .iter()
      .find(|name| !is_identifier(name))
    {
      return Err(ConfigError::InvalidOperatorName(bad.clone()));
    }
    match &self.remote_family {
      RemoteFamily::Prefix(prefix) if prefix.is_empty() => return Err(ConfigError::EmptyPrefix),
      RemoteFamily::Types(types) if types.is_empty() => return Err(ConfigError::NoRemoteTypes),
      _ => {}
    }
    if self.max_type_depth == 0 {
      return Err(ConfigError::ZeroDepth);
    }
    Ok(())
  }

  pub fn is_operator(&self, name: &str) -> bool {
    self.recognized_operators.contains(name)
  }
}

fn is_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if c == '_' || c.is_alphabetic() => chars.all(|c| c == '_' || c.is_alphanumeric()),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prefix_family_matches_by_prefix_not_equality() {
    let family = RemoteFamily::default();
    assert!(family.contains("System.Linq.Queryable"));
    assert!(family.contains("System.Linq.QueryableExtensions"));
    assert!(!family.contains("System.Linq.Enumerable"));
    assert!(!family.contains("Queryable"));
  }

  #[test]
  fn type_family_matches_exactly() {
    let family = RemoteFamily::Types(["System.Linq.Queryable".to_string()].into());
    assert!(family.contains("System.Linq.Queryable"));
    assert!(!family.contains("System.Linq.QueryableExtensions"));
  }

  #[test]
  fn operator_names_are_case_sensitive() {
    let config = AnalyzerConfig::default();
    assert!(config.is_operator("Where"));
    assert!(!config.is_operator("where"));
    assert!(!config.is_operator("Take"));
  }

  #[test]
  fn identifiers_are_validated() {
    assert!(is_identifier("OrderBy"));
    assert!(is_identifier("_Filter2"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("Queryable.Where"));
    assert!(!is_identifier("2nd"));
  }
}
