//! Two-tier write of projection records to a search index.
//!
//! Tier one is a single bulk request for the whole batch; per-item errors
//! in the response are collected, not retried. When the bulk request itself
//! fails, for any reason, the batch is written again one document at a
//! time and each failed write is collected with its reason. Neither tier
//! aborts the run; reachability is checked before indexing starts.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use sentryx_common::PipelineError;

use crate::error::IndexError;
use crate::projector::ProjectionRecord;

/// One document write: `{target, id, body}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexAction {
    pub target: String,
    pub id: String,
    pub body: ProjectionRecord,
}

impl IndexAction {
    pub fn new(target: &str, body: ProjectionRecord) -> Self {
        Self { target: target.to_string(), id: body.identity.clone(), body }
    }
}

/// Per-item result of a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemResult {
    pub id: String,
    pub error: Option<String>,
}

impl BulkItemResult {
    pub fn ok(id: impl Into<String>) -> Self {
        Self { id: id.into(), error: None }
    }

    pub fn failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { id: id.into(), error: Some(reason.into()) }
    }
}

/// Search index seen by the pipeline.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Submit all actions in one request; results come back in action order.
    async fn bulk(&self, actions: &[IndexAction]) -> std::result::Result<Vec<BulkItemResult>, IndexError>;

    async fn index_one(&self, action: &IndexAction) -> std::result::Result<(), IndexError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteTier {
    Bulk,
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedItem {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkOutcome {
    pub success_count: usize,
    pub failed: Vec<FailedItem>,
    pub tier: WriteTier,
}

impl BulkOutcome {
    fn empty(tier: WriteTier) -> Self {
        Self { success_count: 0, failed: Vec::new(), tier }
    }
}

/// Write one batch, falling back to sequential writes if the bulk request fails.
pub async fn bulk_write<I>(index: &I, actions: &[IndexAction]) -> BulkOutcome
where
    I: SearchIndex + ?Sized,
{
    if actions.is_empty() {
        return BulkOutcome::empty(WriteTier::Bulk);
    }

    match index.bulk(actions).await {
        Ok(items) => collect_bulk(actions, items),
        Err(e) => {
            let err = PipelineError::from(e);
            warn!(error = %err, n = actions.len(), "Bulk request failed, writing sequentially");
            write_sequential(index, actions).await
        }
    }
}

fn collect_bulk(actions: &[IndexAction], items: Vec<BulkItemResult>) -> BulkOutcome {
    let mut outcome = BulkOutcome::empty(WriteTier::Bulk);
    for item in &items {
        match &item.error {
            None => outcome.success_count += 1,
            Some(reason) => {
                warn!(doc_id = %item.id, reason = %reason, "Bulk item rejected");
                outcome.failed.push(FailedItem { id: item.id.clone(), reason: reason.clone() });
            }
        }
    }
    for action in actions.iter().skip(items.len()) {
        outcome.failed.push(FailedItem {
            id: action.id.clone(),
            reason: "missing from bulk response".to_string(),
        });
    }
    info!(indexed = outcome.success_count, failed = outcome.failed.len(), "Bulk write complete");
    outcome
}

async fn write_sequential<I>(index: &I, actions: &[IndexAction]) -> BulkOutcome
where
    I: SearchIndex + ?Sized,
{
    let mut outcome = BulkOutcome::empty(WriteTier::Sequential);
    for action in actions {
        match index.index_one(action).await {
            Ok(()) => outcome.success_count += 1,
            Err(e) => {
                warn!(doc_id = %action.id, error = %e, "Document write failed");
                outcome.failed.push(FailedItem { id: action.id.clone(), reason: e.to_string() });
            }
        }
    }
    info!(
        indexed = outcome.success_count,
        failed = outcome.failed.len(),
        "Sequential write complete"
    );
    outcome
}
