use tracing::{debug, error};

use crate::error::Result;
use crate::model::SentimentModel;
use crate::sentiment::{Classification, ReviewText, SentimentLabel};

/// Classifies review text with a borrowed, already loaded model.
/// Holds no state of its own between calls.
pub struct ClassifierService<'a, M: SentimentModel + ?Sized> {
  model: &'a M,
}

impl<'a, M: SentimentModel + ?Sized> ClassifierService<'a, M> {
  pub fn new(model: &'a M) -> Self {
    Self { model }
  }

  /// Classify
  /// Blank text is rejected with `EmptyInput` before the model is touched
  pub fn classify(&self, text: &str) -> Result<Classification> {
    let review: ReviewText = ReviewText::new(text)?;
    self.classify_review(&review)
  }

  pub fn classify_review(&self, review: &ReviewText) -> Result<Classification> {
    let code: i64 = self.model.predict_code(review.as_str())?;
    let label: SentimentLabel = match SentimentLabel::from_code(code) {
      Ok(label) => label,
      Err(e) => {
        error!(code, "classifier emitted a code outside the known labels");
        return Err(e);
      }
    };
    debug!(code, label = %label, bytes = review.as_str().len(), "classified review");
    Ok(Classification { code, label })
  }
}

impl<'a, M: SentimentModel + ?Sized> Clone for ClassifierService<'a, M> {
  fn clone(&self) -> Self {
    Self { model: self.model }
  }
}

/// Classify Many
/// Runs each text independently; one bad input does not stop the rest
pub fn classify_many<M: SentimentModel + ?Sized>(
  service: &ClassifierService<'_, M>,
  texts: &[&str],
) -> Vec<Result<Classification>> {
  texts.iter().map(|text| service.classify(text)).collect()
}
