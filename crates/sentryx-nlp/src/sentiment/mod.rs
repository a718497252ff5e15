//! Sentiment scoring.
//!
//! Two independent lexicon scorers run over the same text:
//! - [`lexical::LexicalPolarity`] averages polarity/subjectivity of known words
//! - [`valence::ValenceAnalyzer`] sums rule-adjusted word valences into a compound score
//!
//! [`consensus::fuse`] combines them into the final label.

pub mod consensus;
pub mod lexical;
pub mod lexicon;
pub mod valence;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral  => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to three decimal places.
pub(crate) fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
