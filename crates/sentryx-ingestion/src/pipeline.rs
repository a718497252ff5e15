//! Indexing run and the full preprocess → enrich → index sequence.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use sentryx_common::{PipelineError, Result, Stage};
use sentryx_config::PipelineConfig;
use sentryx_db::{DocumentQuery, DocumentStore, StageFilter};

use crate::index_writer::{bulk_write, FailedItem, IndexAction, SearchIndex};
use crate::projector::project;
use crate::scheduler::StageReport;
use crate::stages::{enrich_stage, preprocess_stage};

// ── Result summaries ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndexReport {
    pub run_id: Uuid,
    pub projected: u64,
    pub indexed: u64,
    /// Projection failures plus rejected writes.
    pub failed: u64,
    pub batches: u64,
    pub failures: Vec<FailedItem>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunReport {
    pub preprocess: StageReport,
    pub enrich: StageReport,
    pub index: IndexReport,
}

// ── Indexing ──────────────────────────────────────────────────────────────────

/// Project every fully enriched document and write it to `target`.
///
/// Reads are paged with an offset and never modify the store; each page of
/// `index_batch_size` documents becomes one bulk write.
#[instrument(skip(store, index, cfg))]
pub async fn index_documents<S, I>(
    store: &S,
    index: &I,
    target: &str,
    cfg: &PipelineConfig,
) -> Result<IndexReport>
where
    S: DocumentStore + ?Sized,
    I: SearchIndex + ?Sized,
{
    let batch_size = cfg.index_batch_size;
    if batch_size == 0 {
        return Err(PipelineError::Config("index_batch_size must be > 0".into()));
    }

    let started = Instant::now();
    let filter = StageFilter::completed(&[Stage::Preprocess, Stage::Enrich]);
    let total = store
        .count(&filter)
        .await
        .map_err(|e| PipelineError::ConnectionFailure(e.to_string()))?;

    let mut report = IndexReport {
        run_id: Uuid::new_v4(),
        projected: 0,
        indexed: 0,
        failed: 0,
        batches: 0,
        failures: Vec::new(),
        duration_ms: 0,
    };
    info!(run_id = %report.run_id, total, target, "Starting indexing run");

    let mut skip = 0usize;
    loop {
        let query = DocumentQuery::page(filter.clone(), batch_size).with_skip(skip);
        let page = store
            .find(&query)
            .await
            .map_err(|e| PipelineError::ConnectionFailure(e.to_string()))?;
        if page.is_empty() {
            break;
        }
        skip += page.len();
        let page_len = page.len();

        let mut actions = Vec::with_capacity(page_len);
        for doc in &page {
            match project(doc) {
                Ok(record) => actions.push(IndexAction::new(target, record)),
                Err(e) => {
                    let err = PipelineError::from(e);
                    warn!(doc_id = %doc.id, error = %err, "Skipping document");
                    report.failed += 1;
                    report.failures.push(FailedItem { id: doc.id.clone(), reason: err.to_string() });
                }
            }
        }
        report.projected += actions.len() as u64;

        if !actions.is_empty() {
            let outcome = bulk_write(index, &actions).await;
            report.batches += 1;
            report.indexed += outcome.success_count as u64;
            report.failed += outcome.failed.len() as u64;
            report.failures.extend(outcome.failed);
            info!(
                batch = report.batches,
                tier = ?outcome.tier,
                indexed = report.indexed,
                of = total,
                "Batch written"
            );
        }

        if page_len < batch_size {
            break;
        }
    }

    report.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        run_id = %report.run_id,
        indexed = report.indexed,
        failed = report.failed,
        batches = report.batches,
        duration_ms = report.duration_ms,
        "Indexing run complete"
    );
    Ok(report)
}

/// Preprocess, enrich, then index. Stops at the first fatal error.
pub async fn run_all<S, I>(
    store: &S,
    index: &I,
    target: &str,
    cfg: &PipelineConfig,
) -> Result<RunReport>
where
    S: DocumentStore + ?Sized,
    I: SearchIndex + ?Sized,
{
    let preprocess = preprocess_stage(store, cfg.page_size).await?;
    let enrich = enrich_stage(store, cfg.page_size).await?;
    let index = index_documents(store, index, target, cfg).await?;
    Ok(RunReport { preprocess, enrich, index })
}
