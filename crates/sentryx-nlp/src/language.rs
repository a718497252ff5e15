//! Language identification on raw post text.
//!
//! Runs on the original text, not the normalised form: stop-words carry most
//! of the signal a detector needs. Confidence is a length heuristic,
//! `min(0.95, max(0.5, words * 0.1))`, not a model probability.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref NON_LETTER_RE: Regex = Regex::new(r"[^a-zA-Z\s]").unwrap();
}

pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Minimum letters required before attempting detection.
const MIN_LETTERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageGuess {
    pub code: String,
    pub confidence: f64,
}

impl LanguageGuess {
    pub fn unknown() -> Self {
        Self { code: UNKNOWN_LANGUAGE.to_string(), confidence: 0.0 }
    }
}

impl Default for LanguageGuess {
    fn default() -> Self {
        Self::unknown()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, raw: &str) -> LanguageGuess {
        let cleaned = NON_LETTER_RE.replace_all(raw, "");
        let letters = cleaned.chars().filter(|c| !c.is_whitespace()).count();
        if letters < MIN_LETTERS {
            return LanguageGuess::unknown();
        }

        let Some(info) = whatlang::detect(&cleaned) else {
            tracing::trace!("No language detected");
            return LanguageGuess::unknown();
        };

        let words = cleaned.split_whitespace().count() as f64;
        let confidence = (words * 0.1).max(0.5).min(0.95);
        LanguageGuess {
            code: iso_639_1(info.lang().code()).to_string(),
            confidence: (confidence * 100.0).round() / 100.0,
        }
    }
}

/// Two-letter code where one exists for the detector's three-letter code.
fn iso_639_1(code: &'static str) -> &'static str {
    match code {
        "eng" => "en",
        "fra" => "fr",
        "deu" => "de",
        "spa" => "es",
        "por" => "pt",
        "ita" => "it",
        "nld" => "nl",
        "swe" => "sv",
        "dan" => "da",
        "nob" => "nb",
        "fin" => "fi",
        "pol" => "pl",
        "ces" => "cs",
        "slk" => "sk",
        "slv" => "sl",
        "hrv" => "hr",
        "ron" => "ro",
        "hun" => "hu",
        "tur" => "tr",
        "est" => "et",
        "lav" => "lv",
        "lit" => "lt",
        "ind" => "id",
        "vie" => "vi",
        "tgl" => "tl",
        "afr" => "af",
        "lat" => "la",
        "epo" => "eo",
        "zul" => "zu",
        "aka" => "ak",
        "sna" => "sn",
        "uzb" => "uz",
        "aze" => "az",
        "cat" => "ca",
        "jav" => "jv",
        "tuk" => "tk",
        "rus" => "ru",
        "ukr" => "uk",
        "ell" => "el",
        "ara" => "ar",
        "heb" => "he",
        "hin" => "hi",
        "jpn" => "ja",
        "kor" => "ko",
        "cmn" => "zh",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_short_is_unknown() {
        let d = LanguageDetector::new();
        assert_eq!(d.detect(""), LanguageGuess::unknown());
        assert_eq!(d.detect("ok"), LanguageGuess::unknown());
        assert_eq!(d.detect("12345 !!! 😊"), LanguageGuess::unknown());
    }

    #[test]
    fn test_english_sentence() {
        let guess = LanguageDetector::new()
            .detect("This is clearly a sentence written in the English language, with many common words.");
        assert_eq!(guess.code, "en");
        assert_eq!(guess.confidence, 0.95);
    }

    #[test]
    fn test_confidence_floor() {
        let guess = LanguageDetector::new().detect("you are a horrible person");
        assert_eq!(guess.confidence, 0.5);
    }

    #[test]
    fn test_confidence_scales_with_word_count() {
        let guess = LanguageDetector::new()
            .detect("the weather today is cold and windy");
        assert_eq!(guess.confidence, 0.7);
    }

    #[test]
    fn test_french_sentence() {
        let guess = LanguageDetector::new()
            .detect("Je pense que cette maison est vraiment belle et nous allons la visiter demain matin");
        assert_eq!(guess.code, "fr");
    }

    #[test]
    fn test_code_mapping() {
        assert_eq!(iso_639_1("eng"), "en");
        assert_eq!(iso_639_1("yid"), "yid");
    }
}
