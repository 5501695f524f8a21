//! Term table behind the word cloud. Rendering the picture is left to
//! whatever front end displays it.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::preprocessing::tokenize;

const STOPWORDS: [&str; 64] = [
  "a", "about", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
  "because", "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has",
  "have", "he", "her", "his", "how", "if", "in", "into", "is", "it", "its", "just", "me", "my", "no",
  "not", "of", "on", "one", "or", "our", "she", "so", "that", "the", "their", "them", "they", "this",
  "to", "was", "we", "were", "what", "with", "you", "your",
];

/// Word Frequencies
/// Most frequent non-stopword terms, highest count first, ties in alphabetical order
pub fn word_frequencies(text: &str, top_n: usize) -> Result<Vec<(String, usize)>> {
  let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();
  let mut counts: HashMap<String, usize> = HashMap::new();
  for token in tokenize(text)? {
    if !stopwords.contains(token.as_str()) {
      *counts.entry(token).or_insert(0) += 1;
    }
  }

  let mut terms: Vec<(String, usize)> = counts.into_iter().collect();
  terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
  terms.truncate(top_n);
  Ok(terms)
}
