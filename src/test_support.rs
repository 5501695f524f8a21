//! Shared fixtures for unit tests

use ndarray::{Array1, Array2};

use crate::model::{ClassifierArtifact, LinearClassifier};
use crate::preprocessing::TfidfVectorizer;
use crate::sentiment::SentimentLabel;

const NEGATIVE_WORDS: [&str; 6] = ["terrible", "broke", "waste", "money", "worst", "disappointed"];
const NEUTRAL_WORDS: [&str; 5] = ["works", "expected", "special", "fine", "okay"];
const POSITIVE_WORDS: [&str; 7] = ["great", "exactly", "needed", "fast", "excellent", "quality", "love"];

/// Small three-class artifact whose weights are keyed by hand-picked words.
/// Text with none of those words falls to Neutral through its intercept.
pub(crate) fn fixture_artifact() -> ClassifierArtifact {
  let documents: Vec<&str> = vec![
    SentimentLabel::Positive.sample_review(),
    SentimentLabel::Neutral.sample_review(),
    SentimentLabel::Negative.sample_review(),
    "Worst purchase, very disappointed.",
    "Love it, perfect fit.",
    "Okay item for the price.",
  ];
  let vectorizer: TfidfVectorizer = TfidfVectorizer::fit(&documents).unwrap();

  let mut coef: Array2<f64> = Array2::zeros((3, vectorizer.n_features()));
  let rows: [&[&str]; 3] = [&NEGATIVE_WORDS, &NEUTRAL_WORDS, &POSITIVE_WORDS];
  for (row, words) in rows.iter().enumerate() {
    for word in words.iter() {
      let idx: usize = vectorizer.index_of(word).unwrap();
      coef[[row, idx]] = 1.0;
    }
  }

  let model: LinearClassifier =
    LinearClassifier::new(coef, Array1::from(vec![0.0, 0.01, 0.0]), vec![0, 1, 2]).unwrap();
  ClassifierArtifact::new(vectorizer, model).unwrap()
}

/// Same weights as [`fixture_artifact`] but the positive row reports class code 5
pub(crate) fn skewed_artifact() -> ClassifierArtifact {
  let artifact: ClassifierArtifact = fixture_artifact();
  let model: &LinearClassifier = artifact.model();
  let skewed: LinearClassifier =
    LinearClassifier::new(model.coef().clone(), model.intercept().clone(), vec![0, 1, 5]).unwrap();
  ClassifierArtifact::new(artifact.vectorizer().clone(), skewed).unwrap()
}
