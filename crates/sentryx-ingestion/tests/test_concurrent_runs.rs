//! Two schedulers on one store are not coordinated: both may claim the same
//! page. Work is duplicated, but every commit is an idempotent field update on
//! an existing document, so the store ends in the same state.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::Barrier;

use sentryx_common::Stage;
use sentryx_db::{
    Document, DocumentQuery, DocumentStore, FieldUpdate, GroupCount, MemoryStore, NumericSummary,
    Result, StageFilter,
};
use sentryx_ingestion::preprocess_stage;
use sentryx_test_utils::{sample_posts, seeded_store};

/// Holds the first `gated` page reads until all of them have been served,
/// so both runs see the same eligible documents before either commits.
struct GatedStore {
    inner: MemoryStore,
    barrier: Barrier,
    gated: usize,
    reads: AtomicUsize,
}

impl GatedStore {
    fn new(inner: MemoryStore, gated: usize) -> Self {
        Self { inner, barrier: Barrier::new(gated), gated, reads: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn find(&self, query: &DocumentQuery) -> Result<Vec<Document>> {
        let page = self.inner.find(query).await?;
        if self.reads.fetch_add(1, Ordering::SeqCst) < self.gated {
            self.barrier.wait().await;
        }
        Ok(page)
    }

    async fn update_one(&self, id: &str, update: &FieldUpdate) -> Result<bool> {
        self.inner.update_one(id, update).await
    }

    async fn update_many(&self, filter: &StageFilter, update: &FieldUpdate) -> Result<u64> {
        self.inner.update_many(filter, update).await
    }

    async fn count(&self, filter: &StageFilter) -> Result<u64> {
        self.inner.count(filter).await
    }

    async fn aggregate(&self, filter: &StageFilter, group_by: &str) -> Result<Vec<GroupCount>> {
        self.inner.aggregate(filter, group_by).await
    }

    async fn numeric_summary(
        &self,
        filter: &StageFilter,
        path: &str,
    ) -> Result<Option<NumericSummary>> {
        self.inner.numeric_summary(filter, path).await
    }

    async fn insert_many(&self, docs: Vec<Document>) -> Result<usize> {
        self.inner.insert_many(docs).await
    }
}

#[tokio::test]
async fn test_overlapping_runs_duplicate_work_not_documents() {
    let n = sample_posts().len();
    let store = GatedStore::new(seeded_store(), 2);

    let (a, b) = tokio::join!(preprocess_stage(&store, 100), preprocess_stage(&store, 100));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!((a.succeeded + b.succeeded) as usize, 2 * n);
    assert_eq!(a.failed + b.failed, 0);
    assert_eq!(store.inner.len().await, n);
    assert_eq!(
        store.count(&StageFilter::eligible_for(Stage::Preprocess)).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_duplicate_commit_leaves_same_outputs() {
    let single = seeded_store();
    preprocess_stage(&single, 100).await.unwrap();

    let store = GatedStore::new(seeded_store(), 2);
    let _ = tokio::join!(preprocess_stage(&store, 100), preprocess_stage(&store, 100));

    for doc in sample_posts() {
        let once = single.get(&doc.id).await.unwrap();
        let twice = store.inner.get(&doc.id).await.unwrap();
        assert_eq!(once.get("normalized"), twice.get("normalized"));
        assert_eq!(once.flag(Stage::Preprocess), twice.flag(Stage::Preprocess));
    }
}
