//! Failure-injecting store wrapper.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use sentryx_db::{
    DbError, Document, DocumentQuery, DocumentStore, FieldUpdate, GroupCount, NumericSummary,
    Result, StageFilter,
};

/// Delegates to `inner`, except:
/// - commits for ids in `reject_commits` fail with a non-connection error
/// - commits for ids in `vanish` report that no document matched
/// - every call fails with a connection error once `go_offline` is called
pub struct FlakyStore<S> {
    inner: S,
    reject_commits: Mutex<HashSet<String>>,
    vanish: Mutex<HashSet<String>>,
    offline: AtomicBool,
    finds: AtomicUsize,
    commits: AtomicUsize,
}

impl<S: DocumentStore> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reject_commits: Mutex::new(HashSet::new()),
            vanish: Mutex::new(HashSet::new()),
            offline: AtomicBool::new(false),
            finds: AtomicUsize::new(0),
            commits: AtomicUsize::new(0),
        }
    }

    pub fn reject_commit(self, id: &str) -> Self {
        self.reject_commits.lock().unwrap().insert(id.to_string());
        self
    }

    pub fn vanish(self, id: &str) -> Self {
        self.vanish.lock().unwrap().insert(id.to_string());
        self
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DbError::Connection("store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for FlakyStore<S> {
    async fn find(&self, query: &DocumentQuery) -> Result<Vec<Document>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.inner.find(query).await
    }

    async fn update_one(&self, id: &str, update: &FieldUpdate) -> Result<bool> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        if self.reject_commits.lock().unwrap().contains(id) {
            return Err(DbError::InvalidQuery(format!("write rejected for {id}")));
        }
        if self.vanish.lock().unwrap().contains(id) {
            return Ok(false);
        }
        self.inner.update_one(id, update).await
    }

    async fn update_many(&self, filter: &StageFilter, update: &FieldUpdate) -> Result<u64> {
        self.check_online()?;
        self.inner.update_many(filter, update).await
    }

    async fn count(&self, filter: &StageFilter) -> Result<u64> {
        self.check_online()?;
        self.inner.count(filter).await
    }

    async fn aggregate(&self, filter: &StageFilter, group_by: &str) -> Result<Vec<GroupCount>> {
        self.check_online()?;
        self.inner.aggregate(filter, group_by).await
    }

    async fn numeric_summary(
        &self,
        filter: &StageFilter,
        path: &str,
    ) -> Result<Option<NumericSummary>> {
        self.check_online()?;
        self.inner.numeric_summary(filter, path).await
    }

    async fn insert_many(&self, docs: Vec<Document>) -> Result<usize> {
        self.check_online()?;
        self.inner.insert_many(docs).await
    }
}
