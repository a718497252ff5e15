//! Flat, search-ready projection of an enriched document.
//!
//! Stored documents are schemaless, so every field is read through a
//! coercion helper with its own fallback. Only a missing identity rejects a
//! document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sentryx_common::ProjectionError;
use sentryx_db::Document;

/// Maximum title length in characters, before the ellipsis.
pub const TITLE_MAX_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

const UNKNOWN: &str = "unknown";
const ANONYMOUS: &str = "anonymous";
const NEUTRAL: &str = "neutral";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    pub identity: String,
    pub title: String,
    pub content: String,
    pub content_original: String,
    pub content_processed: String,
    pub label: String,
    pub category: String,
    pub author: String,
    pub source_url: String,
    pub language_code: String,
    pub language_confidence: f64,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub sentiment_confidence: f64,
    pub model_a_polarity: f64,
    pub model_a_subjectivity: f64,
    pub model_a_label: String,
    pub model_b_compound: f64,
    pub model_b_positive: f64,
    pub model_b_neutral: f64,
    pub model_b_negative: f64,
    pub model_b_label: String,
    pub char_length: u64,
    pub word_count: u64,
}

/// Project `doc`, defaulting every field that is absent or mistyped.
pub fn project(doc: &Document) -> Result<ProjectionRecord, ProjectionError> {
    if !doc.has_identity() {
        return Err(ProjectionError::MissingIdentity);
    }

    let string = |path: &str| coerce_string(doc.get(path));
    let number = |path: &str, default: f64| coerce_f64(doc.get(path)).unwrap_or(default);
    let string_or = |path: &str, default: &str| string(path).unwrap_or_else(|| default.to_string());

    let content_original = string("text").unwrap_or_default();
    let content_processed = string("normalized.processed_text").unwrap_or_default();
    let content = if content_processed.is_empty() {
        content_original.clone()
    } else {
        content_processed.clone()
    };
    let title = truncate_title(if content_original.is_empty() { &content } else { &content_original });

    Ok(ProjectionRecord {
        identity: doc.id.clone(),
        title,
        label: string_or("label", UNKNOWN),
        category: string_or("type", UNKNOWN),
        author: string_or("author", ANONYMOUS),
        source_url: string_or("url", ""),
        language_code: string_or("enrichment.language.code", UNKNOWN),
        language_confidence: number("enrichment.language.confidence", 0.0),
        sentiment_label: string_or("enrichment.consensus.label", NEUTRAL),
        sentiment_score: number("enrichment.consensus.score", 0.0),
        sentiment_confidence: number("enrichment.consensus.confidence", 0.0),
        model_a_polarity: number("enrichment.model_a.polarity", 0.0),
        model_a_subjectivity: number("enrichment.model_a.subjectivity", 0.0),
        model_a_label: string_or("enrichment.model_a.label", NEUTRAL),
        model_b_compound: number("enrichment.model_b.compound", 0.0),
        model_b_positive: number("enrichment.model_b.positive", 0.0),
        model_b_neutral: number("enrichment.model_b.neutral", 1.0),
        model_b_negative: number("enrichment.model_b.negative", 0.0),
        model_b_label: string_or("enrichment.model_b.label", NEUTRAL),
        char_length: content.chars().count() as u64,
        word_count: content.split_whitespace().count() as u64,
        content,
        content_original,
        content_processed,
    })
}

/// Scalars render as strings; empty strings, null and containers are absent.
fn coerce_string(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// Numbers and numeric strings; anything else, or a non-finite value, is absent.
fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    let x = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

fn truncate_title(text: &str) -> String {
    match text.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
