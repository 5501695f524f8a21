use std::fmt;

use crate::error::{DashboardError, Result};

/// Sentiment predicted by the live classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SentimentLabel {
  Negative,
  Neutral,
  Positive,
}

impl SentimentLabel {
  pub const ALL: [SentimentLabel; 3] = [SentimentLabel::Negative, SentimentLabel::Neutral, SentimentLabel::Positive];

  /// From Code
  /// Maps a classifier output code. Codes outside 0..=2 mean the artifact
  /// does not match this build and are reported, never coerced.
  pub fn from_code(code: i64) -> Result<Self> {
    match code {
      0 => Ok(SentimentLabel::Negative),
      1 => Ok(SentimentLabel::Neutral),
      2 => Ok(SentimentLabel::Positive),
      other => Err(DashboardError::UnknownClassCode(other)),
    }
  }

  pub fn code(self) -> i64 {
    match self {
      SentimentLabel::Negative => 0,
      SentimentLabel::Neutral => 1,
      SentimentLabel::Positive => 2,
    }
  }

  /// Human facing text with the star range the label stands for
  pub fn display(self) -> &'static str {
    match self {
      SentimentLabel::Negative => "Negative (1–2 stars)",
      SentimentLabel::Neutral => "Neutral (3 stars)",
      SentimentLabel::Positive => "Positive (4–5 stars)",
    }
  }

  pub fn tag(self) -> &'static str {
    match self {
      SentimentLabel::Negative => "negative",
      SentimentLabel::Neutral => "neutral",
      SentimentLabel::Positive => "positive",
    }
  }

  pub fn icon(self) -> &'static str {
    match self {
      SentimentLabel::Negative => "😞",
      SentimentLabel::Neutral => "😐",
      SentimentLabel::Positive => "😊",
    }
  }

  /// Canned review for the "Try it" view
  pub fn sample_review(self) -> &'static str {
    match self {
      SentimentLabel::Positive => {
        "Great product! Exactly what I needed. Fast delivery and excellent quality. Will buy again!"
      }
      SentimentLabel::Neutral => "It works as expected. Nothing special, but it does the job fine.",
      SentimentLabel::Negative => {
        "Terrible experience. Broke after one day. Waste of money. Do not recommend."
      }
    }
  }
}

impl fmt::Display for SentimentLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name: &str = match self {
      SentimentLabel::Negative => "Negative",
      SentimentLabel::Neutral => "Neutral",
      SentimentLabel::Positive => "Positive",
    };
    write!(f, "{}", name)
  }
}

/// Sentiment recorded in the historical corpus. The dataset only knows two
/// classes, so this is kept apart from [`SentimentLabel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CorpusSentiment {
  Negative,
  Positive,
}

impl CorpusSentiment {
  /// From Code
  /// 0 is negative, 1 is positive, anything else is unrecognized
  pub fn from_code(code: i64) -> Option<Self> {
    match code {
      0 => Some(CorpusSentiment::Negative),
      1 => Some(CorpusSentiment::Positive),
      _ => None,
    }
  }
}

impl fmt::Display for CorpusSentiment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CorpusSentiment::Negative => write!(f, "Negative"),
      CorpusSentiment::Positive => write!(f, "Positive"),
    }
  }
}

/// Review text accepted for classification (never blank)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewText(String);

impl ReviewText {
  pub fn new(text: &str) -> Result<Self> {
    if text.trim().is_empty() {
      return Err(DashboardError::EmptyInput);
    }
    Ok(Self(text.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Outcome of one classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
  pub code: i64,
  pub label: SentimentLabel,
}

impl Classification {
  pub fn display(&self) -> &'static str {
    self.label.display()
  }

  pub fn tag(&self) -> &'static str {
    self.label.tag()
  }

  pub fn icon(&self) -> &'static str {
    self.label.icon()
  }
}
