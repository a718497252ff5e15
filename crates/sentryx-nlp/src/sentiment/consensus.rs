//! Fusion of the two scorers into one decision.
//!
//! Agreement keeps the shared label at confidence 0.8. On disagreement the
//! valence scorer's label wins at confidence 0.6. The score is always the
//! mean of lexical polarity and valence compound.

use serde::{Deserialize, Serialize};

use super::lexical::PolarityScore;
use super::valence::ValenceScore;
use super::{round3, SentimentLabel};

pub const AGREEMENT_CONFIDENCE: f64 = 0.8;
pub const DISAGREEMENT_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consensus {
    pub label: SentimentLabel,
    pub confidence: f64,
    pub score: f64,
}

pub fn fuse(lexical: &PolarityScore, valence: &ValenceScore) -> Consensus {
    let (label, confidence) = if lexical.label == valence.label {
        (lexical.label, AGREEMENT_CONFIDENCE)
    } else {
        (valence.label, DISAGREEMENT_CONFIDENCE)
    };
    Consensus {
        label,
        confidence,
        score: round3((lexical.polarity + valence.compound) / 2.0),
    }
}
