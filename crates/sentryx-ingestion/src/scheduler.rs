//! Generic stage runner.
//!
//! Pages through documents eligible for a stage, transforms each one and
//! commits the result with a single per-document update. A document that
//! fails is logged and left pending; it is also excluded from later pages of
//! the same run so a page of persistently failing documents cannot loop.
//!
//! The runner assumes it is the only writer for its stage. Two concurrent
//! runs may process the same document twice; the second update overwrites
//! the first with an equivalent result.

use std::collections::HashSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use sentryx_common::{PipelineError, Result, Stage, StageError};
use sentryx_db::{DbError, Document, DocumentQuery, DocumentStore, FieldUpdate, StageFilter};

/// A pure per-document stage function.
pub trait StageTransform: Send + Sync {
    fn stage(&self) -> Stage;

    /// Compute the fields to write for one document.
    fn transform(&self, doc: &Document) -> std::result::Result<FieldUpdate, StageError>;

    /// Log progress after this many successes within a page.
    fn progress_every(&self) -> usize {
        50
    }
}

// ── Result summary ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StageReport {
    pub run_id: Uuid,
    pub stage: Stage,
    pub succeeded: u64,
    pub failed: u64,
    /// Documents that disappeared between query and commit.
    pub skipped: u64,
    pub pages: u64,
    pub duration_ms: u64,
}

impl StageReport {
    fn new(stage: Stage) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            stage,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            pages: 0,
            duration_ms: 0,
        }
    }

    pub fn attempted(&self) -> u64 {
        self.succeeded + self.failed + self.skipped
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// Run `transform` over every document eligible for its stage.
///
/// Only a store failure while fetching a page, or a lost connection while
/// committing, aborts the run.
#[instrument(skip(store, transform), fields(stage = %transform.stage()))]
pub async fn run_stage<S>(
    store: &S,
    transform: &dyn StageTransform,
    page_size: usize,
) -> Result<StageReport>
where
    S: DocumentStore + ?Sized,
{
    if page_size == 0 {
        return Err(PipelineError::Config("page_size must be > 0".into()));
    }

    let stage = transform.stage();
    let filter = StageFilter::eligible_for(stage);
    let started = Instant::now();
    let mut report = StageReport::new(stage);
    let mut failed_ids: HashSet<String> = HashSet::new();

    info!(run_id = %report.run_id, page_size, "Starting stage");

    loop {
        let query = DocumentQuery::page(filter.clone(), page_size).with_exclude(failed_ids.clone());
        let page = store
            .find(&query)
            .await
            .map_err(|e| PipelineError::ConnectionFailure(e.to_string()))?;
        if page.is_empty() {
            break;
        }
        report.pages += 1;
        let page_len = page.len();
        let mut page_ok = 0usize;
        let mut page_failed = 0usize;
        let mut page_skipped = 0usize;

        for doc in page {
            match process_one(store, transform, &doc).await {
                Ok(()) => {
                    report.succeeded += 1;
                    page_ok += 1;
                    if page_ok % transform.progress_every() == 0 {
                        info!(page = report.pages, done = page_ok, of = page_len, "Stage progress");
                    }
                }
                Err(PipelineError::PerDocumentFailure { id, source: StageError::Vanished }) => {
                    debug!(doc_id = %id, "Document vanished before commit");
                    report.skipped += 1;
                    page_skipped += 1;
                    failed_ids.insert(id);
                }
                Err(PipelineError::PerDocumentFailure { id, source }) => {
                    warn!(doc_id = %id, error = %source, "Document failed, left pending");
                    report.failed += 1;
                    page_failed += 1;
                    failed_ids.insert(id);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            page = report.pages,
            processed = page_ok,
            failed = page_failed,
            skipped = page_skipped,
            "Page complete"
        );

        if page_len < page_size {
            break;
        }
    }

    report.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        run_id = %report.run_id,
        succeeded = report.succeeded,
        failed = report.failed,
        skipped = report.skipped,
        pages = report.pages,
        duration_ms = report.duration_ms,
        "Stage complete"
    );
    Ok(report)
}

async fn process_one<S>(store: &S, transform: &dyn StageTransform, doc: &Document) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    let per_doc = |source: StageError| PipelineError::PerDocumentFailure { id: doc.id.clone(), source };

    let update = transform.transform(doc).map_err(per_doc)?;
    match store.update_one(&doc.id, &update).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(per_doc(StageError::Vanished)),
        Err(e) if e.is_connection() => Err(PipelineError::ConnectionFailure(e.to_string())),
        Err(e) => Err(per_doc(commit_error(e))),
    }
}

fn commit_error(e: DbError) -> StageError {
    StageError::Commit(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentryx_db::MemoryStore;
    use serde_json::Value;

    /// Marks documents done; fails those whose text starts with "bad".
    struct Marker;

    impl StageTransform for Marker {
        fn stage(&self) -> Stage {
            Stage::Preprocess
        }

        fn transform(&self, doc: &Document) -> std::result::Result<FieldUpdate, StageError> {
            if doc.raw_text().is_some_and(|t| t.starts_with("bad")) {
                return Err(StageError::Transform("rejected".into()));
            }
            Ok(FieldUpdate::new()
                .set("preprocessed", true)
                .set("normalized", Value::Object(Default::default())))
        }
    }

    fn store_with(texts: &[&str]) -> MemoryStore {
        MemoryStore::with_documents(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| Document::new(format!("d{i:03}")).with("text", *t)),
        )
    }

    #[tokio::test]
    async fn test_processes_all_pages() {
        let store = store_with(&["a", "b", "c", "d", "e"]);
        let report = run_stage(&store, &Marker, 2).await.unwrap();
        assert_eq!(report.succeeded, 5);
        assert_eq!(report.failed, 0);
        assert_eq!(report.pages, 3);
        assert_eq!(store.count(&StageFilter::eligible_for(Stage::Preprocess)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let store = store_with(&["a", "b", "c"]);
        run_stage(&store, &Marker, 10).await.unwrap();
        let again = run_stage(&store, &Marker, 10).await.unwrap();
        assert_eq!(again.succeeded, 0);
        assert_eq!(again.pages, 0);
    }

    #[tokio::test]
    async fn test_failures_skipped_and_left_pending() {
        let store = store_with(&["ok", "bad one", "ok", "bad two", "ok"]);
        let report = run_stage(&store, &Marker, 2).await.unwrap();
        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed, 2);

        let pending = store
            .find(&DocumentQuery::page(StageFilter::eligible_for(Stage::Preprocess), 10))
            .await
            .unwrap();
        let ids: Vec<_> = pending.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d001", "d003"]);
    }

    #[tokio::test]
    async fn test_full_page_of_failures_terminates() {
        let store = store_with(&["bad", "bad", "bad", "bad", "ok"]);
        let report = run_stage(&store, &Marker, 2).await.unwrap();
        assert_eq!(report.failed, 4);
        assert_eq!(report.succeeded, 1);
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() {
        let store = store_with(&["a"]);
        let err = run_stage(&store, &Marker, 0).await.unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryStore::new();
        let report = run_stage(&store, &Marker, 10).await.unwrap();
        assert_eq!(report.attempted(), 0);
    }
}
