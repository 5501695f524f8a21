use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};
use crate::sentiment::CorpusSentiment;

pub const SENTIMENT_COLUMN: &str = "sentiment";
pub const REVIEW_BODY_COLUMN: &str = "review_body";

/// Literal line-break marker found in scraped review bodies
const LINE_BREAK_MARKER: &str = "<br />";

/// One row of the historical dataset
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewRecord {
  pub sentiment: Option<i64>,
  pub review_body: Option<String>,
}

impl ReviewRecord {
  pub fn new(sentiment: Option<i64>, review_body: Option<&str>) -> Self {
    Self { sentiment, review_body: review_body.map(|s| s.to_string()) }
  }

  /// The normalized label, if the raw code is present and known
  pub fn corpus_sentiment(&self) -> Option<CorpusSentiment> {
    self.sentiment.and_then(CorpusSentiment::from_code)
  }
}

/// Non-fatal conditions met while loading the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusNotice {
  MissingFile(PathBuf),
  MissingColumn(&'static str),
  SkippedRows(usize),
}

/// Historical reviews, loaded once and never written back
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
  records: Vec<ReviewRecord>,
  notices: Vec<CorpusNotice>,
}

impl Corpus {
  pub fn from_records(records: Vec<ReviewRecord>) -> Self {
    Self { records, notices: vec![] }
  }

  /// Load
  /// A missing file gives an empty corpus, not an error
  pub fn load(path: &Path) -> Result<Self> {
    let file: File = match File::open(path) {
      Ok(file) => file,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        warn!(path = %path.display(), "corpus file not found, insights disabled");
        return Ok(Self { records: vec![], notices: vec![CorpusNotice::MissingFile(path.to_path_buf())] });
      }
      Err(e) => return Err(DashboardError::Corpus(format!("{}: {}", path.display(), e))),
    };

    let corpus: Corpus = Self::from_reader(file)?;
    info!(
      path = %path.display(),
      records = corpus.len(),
      labelled = corpus.labelled_len(),
      "loaded review corpus"
    );
    Ok(corpus)
  }

  /// From Reader
  /// Parses comma separated text with a header row. Columns are found by name
  /// and a short row leaves its trailing cells missing. Rows that cannot be
  /// decoded are skipped.
  pub fn from_reader<R: Read>(source: R) -> Result<Self> {
    let mut reader: Reader<R> = ReaderBuilder::new().flexible(true).from_reader(source);
    let headers: StringRecord = reader.headers()?.clone();
    let sentiment_idx: Option<usize> = headers.iter().position(|h| h.trim() == SENTIMENT_COLUMN);
    let body_idx: Option<usize> = headers.iter().position(|h| h.trim() == REVIEW_BODY_COLUMN);

    let mut notices: Vec<CorpusNotice> = vec![];
    for (idx, column) in [(sentiment_idx, SENTIMENT_COLUMN), (body_idx, REVIEW_BODY_COLUMN)] {
      if idx.is_none() {
        warn!(column, "corpus column missing");
        notices.push(CorpusNotice::MissingColumn(column));
      }
    }

    let mut records: Vec<ReviewRecord> = vec![];
    let mut skipped: usize = 0;
    for row in reader.records() {
      let row: StringRecord = match row {
        Ok(row) => row,
        Err(e) if e.is_io_error() => return Err(e.into()),
        Err(e) => {
          debug!(error = %e, "skipping malformed corpus row");
          skipped += 1;
          continue;
        }
      };

      let sentiment: Option<i64> = sentiment_idx.and_then(|i| row.get(i)).and_then(parse_sentiment_code);
      let review_body: Option<String> =
        body_idx.and_then(|i| row.get(i)).filter(|cell| !cell.is_empty()).map(|cell| cell.to_string());
      records.push(ReviewRecord { sentiment, review_body });
    }

    if skipped > 0 {
      warn!(skipped, "skipped malformed corpus rows");
      notices.push(CorpusNotice::SkippedRows(skipped));
    }

    Ok(Self { records, notices })
  }

  pub fn notices(&self) -> &[CorpusNotice] {
    &self.notices
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Records whose sentiment code maps to a known label
  pub fn labelled_len(&self) -> usize {
    self.records.iter().filter(|r| r.corpus_sentiment().is_some()).count()
  }

  pub fn has_insights(&self) -> bool {
    self.records.iter().any(|r| r.corpus_sentiment().is_some())
  }

  /// Counts By Sentiment
  /// Only labels that occur are present, so the map is empty for an unlabelled corpus
  pub fn counts_by_sentiment(&self) -> BTreeMap<CorpusSentiment, usize> {
    let mut counts: BTreeMap<CorpusSentiment, usize> = BTreeMap::new();
    for sentiment in self.records.iter().filter_map(ReviewRecord::corpus_sentiment) {
      *counts.entry(sentiment).or_insert(0) += 1;
    }
    counts
  }

  /// Concatenated Text
  /// Every present review body in load order, line-break markers turned into
  /// spaces, joined by single spaces
  pub fn concatenated_text(&self) -> String {
    let bodies: Vec<String> = self
      .records
      .iter()
      .filter_map(|r| r.review_body.as_deref())
      .map(|body| body.replace(LINE_BREAK_MARKER, " "))
      .collect();
    bodies.join(" ")
  }
}

/// Accepts `1` as well as `1.0`, which is how an integer column with gaps
/// tends to be written out
fn parse_sentiment_code(cell: &str) -> Option<i64> {
  let cell: &str = cell.trim();
  if cell.is_empty() {
    return None;
  }
  if let Ok(code) = cell.parse::<i64>() {
    return Some(code);
  }
  match cell.parse::<f64>() {
    Ok(value) if value.is_finite() && value.fract() == 0.0 => Some(value as i64),
    _ => None,
  }
}
