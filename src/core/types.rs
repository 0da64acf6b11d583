// src/core/types.rs
use serde::Deserialize;
use std::fmt;

/// Rating at or above which a review counts as positive.
pub const DEFAULT_POSITIVE_THRESHOLD: i64 = 3;

/// Token counts for one document, one entry per vocabulary column.
pub type CountVector = Vec<u32>;

/// A row in feature space. Counts from the vectorizer, possibly fractional
/// once the oversampler has interpolated new rows.
pub type Sample = Vec<f64>;

/// Binary sentiment verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    /// Both labels, in tie-breaking priority order.
    pub const ALL: [Label; 2] = [Label::Positive, Label::Negative];

    pub fn from_rating(rating: i64, threshold: i64) -> Self {
        if rating >= threshold {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Positive => "POSITIVE",
            Label::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the review corpus.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawReview {
    #[serde(rename = "review")]
    pub text: String,
    pub rating: i64,
}

impl RawReview {
    pub fn new(text: impl Into<String>, rating: i64) -> Self {
        Self { text: text.into(), rating }
    }

    pub fn label(&self, threshold: i64) -> Label {
        Label::from_rating(self.rating, threshold)
    }
}

/// What the pipeline hands back for one review.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: Label,
    /// The review after normalization, for display.
    pub normalized_text: String,
    /// Posterior probability of `label`.
    pub confidence: f64,
}
