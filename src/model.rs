use bincode::Options;
use ndarray::{Array1, Array2};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{DashboardError, Result};
use crate::preprocessing::TfidfVectorizer;

/// Bumped whenever the on-disk layout of either artifact changes
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

const VECTORIZER_KIND: &str = "tfidf-vectorizer";
const MODEL_KIND: &str = "linear-classifier";

/// Anything that turns review text into a raw class code
pub trait SentimentModel {
  fn predict_code(&self, text: &str) -> Result<i64>;
}

/// Linear decision function over tf-idf features.
/// One row per class, or a single row for a two-class model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
  coef: Array2<f64>,
  intercept: Array1<f64>,
  classes: Vec<i64>,
}

impl LinearClassifier {
  /// New
  /// Returns None when the shapes of coef, intercept and classes disagree
  pub fn new(coef: Array2<f64>, intercept: Array1<f64>, classes: Vec<i64>) -> Option<Self> {
    let model: LinearClassifier = Self { coef, intercept, classes };
    model.check().ok()?;
    Some(model)
  }

  pub fn n_features(&self) -> usize {
    self.coef.ncols()
  }

  pub fn classes(&self) -> &[i64] {
    &self.classes
  }

  pub fn coef(&self) -> &Array2<f64> {
    &self.coef
  }

  pub fn intercept(&self) -> &Array1<f64> {
    &self.intercept
  }

  /// Raw per-row scores for one feature vector
  pub fn decision_function(&self, x: &Array1<f64>) -> Array1<f64> {
    self.coef.dot(x) + &self.intercept
  }

  /// Predict
  /// Picks the class code with the highest score (first one on ties).
  /// A single-row model picks `classes[1]` on a positive score.
  pub fn predict(&self, x: &Array1<f64>) -> i64 {
    let scores: Array1<f64> = self.decision_function(x);
    if scores.len() == 1 {
      return if scores[0] > 0.0 { self.classes[1] } else { self.classes[0] };
    }

    let mut best: usize = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
      if score > scores[best] {
        best = i;
      }
    }
    self.classes[best]
  }

  fn check(&self) -> std::result::Result<(), String> {
    let rows: usize = self.coef.nrows();
    if rows == 0 {
      return Err("model has no classes".to_string());
    }
    if self.intercept.len() != rows {
      return Err(format!("intercept has {} entries for {} coefficient rows", self.intercept.len(), rows));
    }
    let expected_classes: usize = if rows == 1 { 2 } else { rows };
    if self.classes.len() != expected_classes {
      return Err(format!("expected {} class codes but found {}", expected_classes, self.classes.len()));
    }
    if !self.coef.iter().chain(self.intercept.iter()).all(|w| w.is_finite()) {
      return Err("model has non-finite weights".to_string());
    }
    Ok(())
  }
}

/// Loaded vectorizer and model. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierArtifact {
  vectorizer: TfidfVectorizer,
  model: LinearClassifier,
}

impl ClassifierArtifact {
  /// New
  /// Pairs a vectorizer with a model. None if their feature counts disagree.
  pub fn new(vectorizer: TfidfVectorizer, model: LinearClassifier) -> Option<Self> {
    if vectorizer.n_features() != model.n_features() {
      return None;
    }
    Some(Self { vectorizer, model })
  }

  /// Load
  /// Reads both artifact files. Any failure here is fatal to the caller.
  pub fn load(vectorizer_path: &Path, model_path: &Path) -> Result<Self> {
    let vectorizer: TfidfVectorizer = read_artifact(vectorizer_path, VECTORIZER_KIND)?;
    vectorizer.check().map_err(|e| DashboardError::artifact_load(vectorizer_path, e))?;

    let model: LinearClassifier = read_artifact(model_path, MODEL_KIND)?;
    model.check().map_err(|e| DashboardError::artifact_load(model_path, e))?;

    if vectorizer.n_features() != model.n_features() {
      let reason: String = format!(
        "model expects {} features but the vectorizer produces {}",
        model.n_features(),
        vectorizer.n_features()
      );
      return Err(DashboardError::artifact_load(model_path, reason));
    }

    info!(
      vocabulary = vectorizer.n_features(),
      classes = model.classes().len(),
      "loaded classifier artifact"
    );
    Ok(Self { vectorizer, model })
  }

  /// Save
  /// Writes the pair in the format `load` reads
  pub fn save(&self, vectorizer_path: &Path, model_path: &Path) -> Result<()> {
    write_artifact(vectorizer_path, VECTORIZER_KIND, &self.vectorizer)?;
    write_artifact(model_path, MODEL_KIND, &self.model)?;
    Ok(())
  }

  pub fn vectorizer(&self) -> &TfidfVectorizer {
    &self.vectorizer
  }

  pub fn model(&self) -> &LinearClassifier {
    &self.model
  }
}

impl SentimentModel for ClassifierArtifact {
  fn predict_code(&self, text: &str) -> Result<i64> {
    let x: Array1<f64> = self.vectorizer.transform(text)?;
    Ok(self.model.predict(&x))
  }
}

/// Fixed-width little-endian encoding, shared by reader and writer
fn artifact_options() -> impl Options {
  bincode::DefaultOptions::new().with_fixint_encoding().allow_trailing_bytes()
}

fn read_artifact<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<T> {
  let bytes: Vec<u8> = std::fs::read(path).map_err(|e| DashboardError::artifact_load(path, e))?;
  // no length prefix may claim more than the file holds
  let limit: u64 = bytes.len() as u64;
  let mut reader: &[u8] = &bytes;
  let decode = |e: bincode::Error| DashboardError::artifact_load(path, e);

  let found_kind: String = artifact_options().with_limit(limit).deserialize_from(&mut reader).map_err(decode)?;
  if found_kind != kind {
    return Err(DashboardError::artifact_load(path, format!("expected a {} artifact, found {}", kind, found_kind)));
  }
  let version: u32 = artifact_options().with_limit(limit).deserialize_from(&mut reader).map_err(decode)?;
  if version != ARTIFACT_FORMAT_VERSION {
    let reason: String = format!("format version {} is not supported (expected {})", version, ARTIFACT_FORMAT_VERSION);
    return Err(DashboardError::artifact_load(path, reason));
  }
  artifact_options().with_limit(limit).deserialize_from(&mut reader).map_err(decode)
}

fn write_artifact<T: Serialize>(path: &Path, kind: &str, payload: &T) -> Result<()> {
  let mut writer: BufWriter<File> = BufWriter::new(File::create(path)?);
  let encode = |e: bincode::Error| DashboardError::artifact_load(path, e);
  artifact_options().serialize_into(&mut writer, kind).map_err(encode)?;
  artifact_options().serialize_into(&mut writer, &ARTIFACT_FORMAT_VERSION).map_err(encode)?;
  artifact_options().serialize_into(&mut writer, payload).map_err(encode)?;
  writer.flush()?;
  Ok(())
}
