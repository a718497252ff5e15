//! Lexical polarity scorer.
//!
//! Every known word contributes a `(polarity, subjectivity)` assessment.
//! A preceding intensifier scales the assessment, a preceding negation flips
//! and halves its polarity. The text score is the mean over all assessments.

use serde::{Deserialize, Serialize};

use super::lexicon;
use super::{round3, SentimentLabel};

/// Polarity above this is positive, below its negation negative.
pub const POLARITY_THRESHOLD: f64 = 0.1;

const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarityScore {
    pub polarity: f64,
    pub subjectivity: f64,
    pub label: SentimentLabel,
}

impl Default for PolarityScore {
    fn default() -> Self {
        Self { polarity: 0.0, subjectivity: 0.0, label: SentimentLabel::Neutral }
    }
}

pub fn label_for(polarity: f64) -> SentimentLabel {
    if polarity > POLARITY_THRESHOLD {
        SentimentLabel::Positive
    } else if polarity < -POLARITY_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

#[derive(Debug, Clone, Default)]
pub struct LexicalPolarity;

impl LexicalPolarity {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text: &str) -> PolarityScore {
        if text.trim().is_empty() {
            return PolarityScore::default();
        }

        let mut assessments: Vec<(f64, f64)> = Vec::new();
        let mut negate = false;
        let mut boost = 1.0;

        for raw in text.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase();
            if word.is_empty() {
                continue;
            }
            if lexicon::is_negation(&word) {
                negate = true;
                continue;
            }
            if let Some(factor) = lexicon::intensifier(&word) {
                boost *= factor;
                continue;
            }
            if let Some(entry) = lexicon::polarity(&word) {
                let mut polarity = entry.polarity * boost;
                if negate {
                    polarity *= NEGATION_FACTOR;
                }
                let subjectivity = entry.subjectivity * boost;
                assessments.push((polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)));
            }
            negate = false;
            boost = 1.0;
        }

        if assessments.is_empty() {
            return PolarityScore::default();
        }

        let n = assessments.len() as f64;
        let polarity = round3(assessments.iter().map(|a| a.0).sum::<f64>() / n);
        let subjectivity = round3(assessments.iter().map(|a| a.1).sum::<f64>() / n);
        PolarityScore { polarity, subjectivity, label: label_for(polarity) }
    }
}
