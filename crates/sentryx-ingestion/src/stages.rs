//! The two enrichment stages.
//!
//! `Preprocessor` writes `normalized`; `Enricher` reads it and writes
//! `enrichment`. Both mark their flag and a completion timestamp in the same
//! update, so a document never carries a flag without its output.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use sentryx_common::{Result, Stage, StageError};
use sentryx_db::{Document, DocumentStore, FieldUpdate};
use sentryx_nlp::{TextAnalyzer, TextNormaliser};

use crate::scheduler::{run_stage, StageReport, StageTransform};

const PREPROCESS_PROGRESS_EVERY: usize = 50;
const ENRICH_PROGRESS_EVERY: usize = 25;

/// Output field, flag and timestamp for a finished stage.
fn completion_update(stage: Stage, output: &impl Serialize) -> std::result::Result<FieldUpdate, StageError> {
    let output = serde_json::to_value(output).map_err(|e| StageError::Transform(e.to_string()))?;
    Ok(FieldUpdate::new()
        .set(stage.output_field(), output)
        .set(stage.flag_field(), true)
        .set(stage.timestamp_field(), Utc::now().to_rfc3339()))
}

// ── Preprocess ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    normaliser: TextNormaliser,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StageTransform for Preprocessor {
    fn stage(&self) -> Stage {
        Stage::Preprocess
    }

    fn transform(&self, doc: &Document) -> std::result::Result<FieldUpdate, StageError> {
        let normalised = self.normaliser.normalise_value(doc.raw_text_value());
        completion_update(Stage::Preprocess, &normalised)
    }

    fn progress_every(&self) -> usize {
        PREPROCESS_PROGRESS_EVERY
    }
}

// ── Enrich ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Enricher {
    analyzer: TextAnalyzer,
}

impl Enricher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StageTransform for Enricher {
    fn stage(&self) -> Stage {
        Stage::Enrich
    }

    fn transform(&self, doc: &Document) -> std::result::Result<FieldUpdate, StageError> {
        let processed = match doc.get(Stage::Preprocess.output_field()) {
            None | Some(Value::Null) => None,
            Some(Value::Object(normalized)) => normalized.get("processed_text").and_then(Value::as_str),
            Some(_) => {
                return Err(StageError::Transform("normalized is not an object".into()));
            }
        };
        let raw = doc.raw_text().unwrap_or("");
        let enrichment = self.analyzer.analyze(raw, processed);
        completion_update(Stage::Enrich, &enrichment)
    }

    fn progress_every(&self) -> usize {
        ENRICH_PROGRESS_EVERY
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

pub async fn preprocess_stage<S>(store: &S, page_size: usize) -> Result<StageReport>
where
    S: DocumentStore + ?Sized,
{
    run_stage(store, &Preprocessor::new(), page_size).await
}

pub async fn enrich_stage<S>(store: &S, page_size: usize) -> Result<StageReport>
where
    S: DocumentStore + ?Sized,
{
    run_stage(store, &Enricher::new(), page_size).await
}
