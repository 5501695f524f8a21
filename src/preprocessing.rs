use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{DashboardError, Result};

/// Tokenize
/// Lowercases the text and splits it into word tokens. Punctuation runs and
/// single characters are dropped.
pub fn tokenize(text: &str) -> Result<Vec<String>> {
  let lowered: String = text.to_lowercase();
  let mut pretokenized: PreTokenizedString = PreTokenizedString::from(lowered.as_str());
  Whitespace::default()
    .pre_tokenize(&mut pretokenized)
    .map_err(|e| DashboardError::Tokenization(e.to_string()))?;

  let tokens: Vec<String> = pretokenized
    .get_splits(OffsetReferential::Original, OffsetType::Byte)
    .into_iter()
    .map(|(token, _, _)| token)
    .filter(|token| is_word(token))
    .map(|token| token.to_string())
    .collect();
  Ok(tokens)
}

fn is_word(token: &str) -> bool {
  token.chars().count() >= 2 && token.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Fitted TF-IDF transform. The vocabulary and idf weights are frozen once
/// built; `transform` never refits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
  vocabulary: BTreeMap<String, usize>,
  idf: Array1<f64>,
}

impl TfidfVectorizer {
  /// Fit
  /// Learns an alphabetically ordered vocabulary and smoothed idf weights
  pub fn fit(documents: &[&str]) -> Result<Self> {
    let n_docs: usize = documents.len();
    let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
    for doc in documents {
      let unique_terms: HashSet<String> = tokenize(doc)?.into_iter().collect();
      for term in unique_terms {
        *doc_freq.entry(term).or_insert(0) += 1;
      }
    }

    let mut vocabulary: BTreeMap<String, usize> = BTreeMap::new();
    let mut idf: Vec<f64> = Vec::with_capacity(doc_freq.len());
    for (i, (term, df)) in doc_freq.into_iter().enumerate() {
      idf.push(((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0);
      vocabulary.insert(term, i);
    }

    Ok(Self { vocabulary, idf: Array1::from(idf) })
  }

  /// Transform
  /// Converts one text into an L2-normalized tf-idf vector. Unknown words are ignored.
  pub fn transform(&self, text: &str) -> Result<Array1<f64>> {
    let mut counts: HashMap<usize, f64> = HashMap::new();
    for token in tokenize(text)? {
      if let Some(&idx) = self.vocabulary.get(&token) {
        *counts.entry(idx).or_insert(0.0) += 1.0;
      }
    }

    let mut vector: Array1<f64> = Array1::zeros(self.n_features());
    for (idx, tf) in counts {
      vector[idx] = tf * self.idf[idx];
    }

    let norm: f64 = vector.dot(&vector).sqrt();
    if norm > 0.0 {
      vector.mapv_inplace(|x| x / norm);
    }
    Ok(vector)
  }

  pub fn n_features(&self) -> usize {
    self.idf.len()
  }

  pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
    &self.vocabulary
  }

  pub fn index_of(&self, term: &str) -> Option<usize> {
    self.vocabulary.get(term).copied()
  }

  pub fn idf(&self) -> &Array1<f64> {
    &self.idf
  }

  /// Consistency check run on freshly deserialized vectorizers
  pub(crate) fn check(&self) -> std::result::Result<(), String> {
    if self.vocabulary.len() != self.idf.len() {
      return Err(format!(
        "vocabulary has {} terms but idf has {} weights",
        self.vocabulary.len(),
        self.idf.len()
      ));
    }
    if !self.idf.iter().all(|w| w.is_finite()) {
      return Err("idf has non-finite weights".to_string());
    }
    let mut seen: Vec<bool> = vec![false; self.idf.len()];
    for (term, &idx) in &self.vocabulary {
      if idx >= seen.len() || seen[idx] {
        return Err(format!("term '{}' has invalid index {}", term, idx));
      }
      seen[idx] = true;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn it_tokenizes_like_a_word_vectorizer() {
    let tokens: Vec<String> = tokenize("Great product! I've 2 items, A+ quality_check.").unwrap();
    assert_eq!(tokens, vec!["great", "product", "ve", "items", "quality_check"]);
  }

  #[test]
  fn it_tokenizes_blank_text_to_nothing() {
    assert!(tokenize("   ").unwrap().is_empty());
    assert!(tokenize("!!! ?").unwrap().is_empty());
  }

  #[test]
  fn it_fits_a_sorted_vocabulary() {
    let vectorizer: TfidfVectorizer = TfidfVectorizer::fit(&["zebra apple", "apple mango"]).unwrap();
    let terms: Vec<&String> = vectorizer.vocabulary().keys().collect();
    assert_eq!(terms, vec!["apple", "mango", "zebra"]);
    assert_eq!(vectorizer.index_of("apple"), Some(0));
    assert_eq!(vectorizer.index_of("zebra"), Some(2));

    // "apple" is in every document so its idf is exactly 1
    assert!((vectorizer.idf()[0] - 1.0).abs() < 1e-12);
    let expected: f64 = (3.0f64 / 2.0).ln() + 1.0;
    assert!((vectorizer.idf()[2] - expected).abs() < 1e-12);
  }

  #[test]
  fn it_transforms_to_unit_length() {
    let vectorizer: TfidfVectorizer = TfidfVectorizer::fit(&["good phone", "bad phone", "good case"]).unwrap();
    let x: Array1<f64> = vectorizer.transform("Good good PHONE").unwrap();
    assert_eq!(x.len(), vectorizer.n_features());
    assert!((x.dot(&x) - 1.0).abs() < 1e-9);

    let bad: usize = vectorizer.index_of("bad").unwrap();
    assert_eq!(x[bad], 0.0);
  }

  #[test]
  fn it_maps_unknown_words_to_the_zero_vector() {
    let vectorizer: TfidfVectorizer = TfidfVectorizer::fit(&["good phone"]).unwrap();
    let x: Array1<f64> = vectorizer.transform("completely unrelated").unwrap();
    assert!(x.iter().all(|&v| v == 0.0));
  }

  #[test]
  fn it_rejects_inconsistent_parts() {
    let mut vocabulary: BTreeMap<String, usize> = BTreeMap::new();
    vocabulary.insert("good".to_string(), 0);
    vocabulary.insert("bad".to_string(), 0);
    let clashing: TfidfVectorizer = TfidfVectorizer { vocabulary, idf: Array1::from(vec![1.0, 1.0]) };
    assert!(clashing.check().is_err());

    let mut vocabulary: BTreeMap<String, usize> = BTreeMap::new();
    vocabulary.insert("good".to_string(), 0);
    let consistent: TfidfVectorizer = TfidfVectorizer { vocabulary: vocabulary.clone(), idf: Array1::from(vec![1.0]) };
    assert!(consistent.check().is_ok());

    let poisoned: TfidfVectorizer = TfidfVectorizer { vocabulary, idf: Array1::from(vec![f64::NAN]) };
    assert!(poisoned.check().is_err());
  }
}
