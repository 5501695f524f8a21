use std::collections::BTreeMap;

use crate::corpus::Corpus;
use crate::error::Result;
use crate::sentiment::CorpusSentiment;
use crate::wordcloud::word_frequencies;

/// Aggregate view over the historical corpus
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
  /// Reviews with a recognized sentiment
  pub total_reviews: usize,
  pub counts: BTreeMap<CorpusSentiment, usize>,
  /// None when the corpus has no usable review text
  pub word_cloud: Option<Vec<(String, usize)>>,
}

impl Insights {
  /// From Corpus
  /// None when no record carries a recognized sentiment
  pub fn from_corpus(corpus: &Corpus, top_terms: usize) -> Result<Option<Self>> {
    if !corpus.has_insights() {
      return Ok(None);
    }

    let text: String = corpus.concatenated_text();
    let word_cloud: Option<Vec<(String, usize)>> = if text.trim().is_empty() {
      None
    } else {
      Some(word_frequencies(&text, top_terms)?)
    };

    Ok(Some(Self { total_reviews: corpus.labelled_len(), counts: corpus.counts_by_sentiment(), word_cloud }))
  }

  pub fn count(&self, sentiment: CorpusSentiment) -> usize {
    self.counts.get(&sentiment).copied().unwrap_or(0)
  }

  /// Bar Chart
  /// One text bar per label, scaled so the largest count spans `width` cells
  pub fn bar_chart(&self, width: usize) -> Vec<String> {
    let max: usize = self.counts.values().copied().max().unwrap_or(0);
    self
      .counts
      .iter()
      .map(|(sentiment, &count)| {
        let cells: usize = if max == 0 { 0 } else { (count * width + max - 1) / max };
        format!("{:<8} | {} {}", sentiment.to_string(), "█".repeat(cells), count)
      })
      .collect()
  }
}
