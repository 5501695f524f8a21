//! Configuration management
//!
//! Every path is relative to an installation root unless given absolute.
//! An optional `dashboard.toml` in the root overrides the defaults.

use serde::{Deserialize, Serialize};
use tracing::info;

use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};

pub const CONFIG_FILE_NAME: &str = "dashboard.toml";

/// Paths and display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
  #[serde(skip)]
  pub root: PathBuf,
  pub vectorizer_path: PathBuf,
  pub model_path: PathBuf,
  pub corpus_path: PathBuf,
  /// Number of terms listed for the word cloud
  pub word_cloud_terms: usize,
}

impl Default for DashboardConfig {
  fn default() -> Self {
    Self {
      root: PathBuf::from("."),
      vectorizer_path: PathBuf::from("models/vectorizer.bin"),
      model_path: PathBuf::from("models/sentiment_model.bin"),
      corpus_path: PathBuf::from("data/Amazon Product Review.txt"),
      word_cloud_terms: 40,
    }
  }
}

impl DashboardConfig {
  /// From Root
  /// Defaults for `root`, overridden by `root/dashboard.toml` when it exists
  pub fn from_root(root: &Path) -> Result<Self> {
    let config_path: PathBuf = root.join(CONFIG_FILE_NAME);
    let mut config: DashboardConfig = if config_path.is_file() {
      let contents: String = std::fs::read_to_string(&config_path)?;
      let parsed: DashboardConfig = toml::from_str(&contents)
        .map_err(|e| DashboardError::Config(format!("{}: {}", config_path.display(), e)))?;
      info!(path = %config_path.display(), "loaded dashboard config");
      parsed
    } else {
      Self::default()
    };
    config.root = root.to_path_buf();
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if self.word_cloud_terms == 0 {
      return Err(DashboardError::Config("word_cloud_terms must be at least 1".to_string()));
    }
    Ok(())
  }

  fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  pub fn vectorizer_file(&self) -> PathBuf {
    self.resolve(&self.vectorizer_path)
  }

  pub fn model_file(&self) -> PathBuf {
    self.resolve(&self.model_path)
  }

  pub fn corpus_file(&self) -> PathBuf {
    self.resolve(&self.corpus_path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn it_resolves_defaults_against_the_root() {
    let dir: TempDir = TempDir::new().unwrap();
    let config: DashboardConfig = DashboardConfig::from_root(dir.path()).unwrap();
    assert_eq!(config.model_file(), dir.path().join("models/sentiment_model.bin"));
    assert_eq!(config.vectorizer_file(), dir.path().join("models/vectorizer.bin"));
    assert_eq!(config.corpus_file(), dir.path().join("data/Amazon Product Review.txt"));
  }

  #[test]
  fn it_applies_overrides_from_the_config_file() {
    let dir: TempDir = TempDir::new().unwrap();
    std::fs::write(
      dir.path().join(CONFIG_FILE_NAME),
      "corpus_path = \"reviews.csv\"\nword_cloud_terms = 10\nmodel_path = \"/opt/models/m.bin\"\n",
    )
    .unwrap();

    let config: DashboardConfig = DashboardConfig::from_root(dir.path()).unwrap();
    assert_eq!(config.corpus_file(), dir.path().join("reviews.csv"));
    assert_eq!(config.model_file(), PathBuf::from("/opt/models/m.bin"));
    assert_eq!(config.word_cloud_terms, 10);
    assert_eq!(config.vectorizer_file(), dir.path().join("models/vectorizer.bin"));
  }

  #[test]
  fn it_rejects_a_broken_config_file() {
    let dir: TempDir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "word_cloud_terms = \"many\"").unwrap();
    let err: DashboardError = DashboardConfig::from_root(dir.path()).unwrap_err();
    assert!(matches!(err, DashboardError::Config(_)));

    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "word_cloud_terms = 0").unwrap();
    assert!(matches!(DashboardConfig::from_root(dir.path()), Err(DashboardError::Config(_))));
  }
}
