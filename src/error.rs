//! Error types for the review sentiment dashboard

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum DashboardError {
  /// Vectorizer or model artifact missing, corrupt or from another version.
  /// Fatal at startup.
  #[error("Failed to load artifact {path}: {reason}")]
  ArtifactLoad { path: PathBuf, reason: String },

  /// Classification requested on blank text
  #[error("Please enter a review first.")]
  EmptyInput,

  /// The model produced a class code outside the three known labels
  #[error("Classifier returned unknown class code {0}")]
  UnknownClassCode(i64),

  #[error("Tokenization failed: {0}")]
  Tokenization(String),

  /// Corpus file exists but could not be read
  #[error("Failed to read corpus: {0}")]
  Corpus(String),

  #[error("Invalid configuration: {0}")]
  Config(String),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

impl DashboardError {
  /// Artifact Load
  /// Shorthand used by the artifact readers
  pub fn artifact_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
    DashboardError::ArtifactLoad { path: path.into(), reason: reason.to_string() }
  }

  /// Whether the error belongs to a single user action and leaves the session usable
  pub fn is_recoverable(&self) -> bool {
    matches!(
      self,
      DashboardError::EmptyInput | DashboardError::UnknownClassCode(_) | DashboardError::Tokenization(_)
    )
  }
}

impl From<csv::Error> for DashboardError {
  fn from(value: csv::Error) -> Self {
    DashboardError::Corpus(value.to_string())
  }
}
