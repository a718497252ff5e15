//! Combined enrichment of one document's text.

use serde::{Deserialize, Serialize};

use crate::language::{LanguageDetector, LanguageGuess};
use crate::sentiment::consensus::{fuse, Consensus};
use crate::sentiment::lexical::{LexicalPolarity, PolarityScore};
use crate::sentiment::valence::{ValenceAnalyzer, ValenceScore};

/// Stored under the `enrichment` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub language: LanguageGuess,
    pub model_a: PolarityScore,
    pub model_b: ValenceScore,
    pub consensus: Consensus,
}

#[derive(Debug, Clone, Default)]
pub struct TextAnalyzer {
    language: LanguageDetector,
    lexical: LexicalPolarity,
    valence: ValenceAnalyzer,
}

impl TextAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Language is detected on `raw`. Sentiment uses `processed` when it is
    /// non-empty, otherwise `raw`.
    pub fn analyze(&self, raw: &str, processed: Option<&str>) -> Enrichment {
        let sentiment_text = processed.filter(|p| !p.trim().is_empty()).unwrap_or(raw);

        let language = self.language.detect(raw);
        let model_a = self.lexical.score(sentiment_text);
        let model_b = self.valence.score(sentiment_text);
        let consensus = fuse(&model_a, &model_b);

        Enrichment { language, model_a, model_b, consensus }
    }
}
