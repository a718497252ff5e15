//! Text normalisation for the preprocess stage.
//!
//! Turns a raw post into a cleaned, tokenised, lemmatised representation.
//! The steps always run in the same order:
//!
//! 1. lower-case
//! 2. strip markup, keeping rendered text
//! 3. strip URLs
//! 4. strip anything that is not an ASCII letter, digit or whitespace
//! 5. strip remaining punctuation and digits
//! 6. collapse whitespace (this is `cleaned_text`)
//! 7. split on whitespace
//! 8. drop English stop-words
//! 9. lemmatise
//! 10. drop tokens shorter than two characters
//!
//! # Example
//! ```
//! use sentryx_nlp::TextNormaliser;
//!
//! let out = TextNormaliser::new().normalise("The <b>dogs</b> were barking at https://x.io");
//! assert_eq!(out.processed_text, "dog barking");
//! assert_eq!(out.token_count, out.tokens.len());
//! ```

pub mod lemma;
pub mod stopwords;

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::Value;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(
        r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+"
    ).unwrap();
    static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-zA-Z0-9\s]").unwrap();
    static ref DIGITS_RE: Regex = Regex::new(r"[0-9]+").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Output of the normaliser, stored under the `normalized` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalisedText {
    pub cleaned_text: String,
    pub tokens: Vec<String>,
    pub processed_text: String,
    /// Always `tokens.len()`.
    pub token_count: usize,
}

impl NormalisedText {
    fn from_tokens(cleaned_text: String, tokens: Vec<String>) -> Self {
        let processed_text = tokens.join(" ");
        Self {
            cleaned_text,
            token_count: tokens.len(),
            tokens,
            processed_text,
        }
    }
}

/// Stateless English normaliser.
#[derive(Debug, Clone, Default)]
pub struct TextNormaliser;

impl TextNormaliser {
    pub fn new() -> Self {
        Self
    }

    /// Normalise a raw field value. Anything other than a non-empty string
    /// yields the empty default.
    pub fn normalise_value(&self, raw: Option<&Value>) -> NormalisedText {
        match raw {
            Some(Value::String(s)) => self.normalise(s),
            _ => NormalisedText::default(),
        }
    }

    pub fn normalise(&self, text: &str) -> NormalisedText {
        if text.is_empty() {
            return NormalisedText::default();
        }

        let cleaned = clean(text);
        let tokens = cleaned
            .split_whitespace()
            .filter(|t| !stopwords::is_stopword(t))
            .map(lemma::lemmatize)
            .filter(|t| t.chars().count() > 1)
            .collect();

        NormalisedText::from_tokens(cleaned, tokens)
    }
}

/// Steps 1 through 6.
fn clean(text: &str) -> String {
    let lowered = text.to_lowercase();
    let rendered = strip_markup(&lowered);
    let no_urls = URL_RE.replace_all(&rendered, "");
    let alnum = NON_ALNUM_RE.replace_all(&no_urls, "");
    let letters: String = DIGITS_RE
        .replace_all(&alnum, "")
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    WHITESPACE_RE.replace_all(&letters, " ").trim().to_string()
}

fn strip_markup(text: &str) -> String {
    if !text.contains('<') && !text.contains('&') {
        return text.to_string();
    }
    let fragment = Html::parse_fragment(text);
    fragment.root_element().text().collect::<Vec<_>>().join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_and_non_string_inputs_default() {
        let n = TextNormaliser::new();
        assert_eq!(n.normalise(""), NormalisedText::default());
        assert_eq!(n.normalise_value(None), NormalisedText::default());
        assert_eq!(n.normalise_value(Some(&Value::Null)), NormalisedText::default());
        assert_eq!(n.normalise_value(Some(&json!(42))), NormalisedText::default());
        assert_eq!(n.normalise_value(Some(&json!(["a"]))), NormalisedText::default());
    }

    #[test]
    fn test_whitespace_only_yields_empty() {
        let out = TextNormaliser::new().normalise("   \n\t ");
        assert_eq!(out.cleaned_text, "");
        assert_eq!(out.token_count, 0);
    }

    #[test]
    fn test_markup_and_urls_removed() {
        let out = TextNormaliser::new()
            .normalise("<p>Check <a href=\"http://spam.example\">this</a> http://t.co/abc123 now</p>");
        assert_eq!(out.cleaned_text, "check this now");
        assert_eq!(out.tokens, vec!["check"]);
    }

    #[test]
    fn test_emoji_punctuation_and_digits_removed() {
        let out = TextNormaliser::new().normalise("I LOVE this!!! 😊 100%");
        assert_eq!(out.cleaned_text, "i love this");
        assert_eq!(out.processed_text, "love");
    }

    #[test]
    fn test_lemmatises_and_drops_short_tokens() {
        let out = TextNormaliser::new().normalise("Stupid idiots and their boxes, x y z");
        assert_eq!(out.tokens, vec!["stupid", "idiot", "box"]);
        assert_eq!(out.processed_text, "stupid idiot box");
    }

    #[test]
    fn test_token_count_matches_tokens() {
        let n = TextNormaliser::new();
        for text in [
            "",
            "a",
            "the the the",
            "You are all such wonderful people!!",
            "<div>nested <span>markup</span></div> &amp; entities",
            "ünïcödé wörds and ascii words",
        ] {
            let out = n.normalise(text);
            assert_eq!(out.token_count, out.tokens.len(), "input: {text:?}");
            assert_eq!(out.processed_text, out.tokens.join(" "));
        }
    }

    #[test]
    fn test_deterministic() {
        let n = TextNormaliser::new();
        let text = "Cats chasing mice across the houses";
        assert_eq!(n.normalise(text), n.normalise(text));
        assert_eq!(n.normalise(text).tokens, vec!["cat", "chasing", "mouse", "across", "house"]);
    }
}
