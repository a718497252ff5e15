//! sentryx-nlp: Pure text analysis used by the enrichment stages.
//!
//! - `normalise`: lower-casing, markup/URL stripping, stop-word removal, lemmatisation
//! - `language`: language identification on raw text
//! - `sentiment`: two independent lexicon scorers and their consensus
//!
//! Nothing in this crate touches the store; every function is deterministic.

pub mod analyzer;
pub mod language;
pub mod normalise;
pub mod sentiment;

pub use analyzer::{Enrichment, TextAnalyzer};
pub use language::{LanguageDetector, LanguageGuess};
pub use normalise::{NormalisedText, TextNormaliser};
pub use sentiment::{
    consensus::{fuse, Consensus},
    lexical::{LexicalPolarity, PolarityScore},
    valence::{ValenceAnalyzer, ValenceScore},
    SentimentLabel,
};
