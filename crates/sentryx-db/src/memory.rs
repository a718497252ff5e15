//! In-process document store.
//!
//! Insertion order is the natural retrieval order. The whole collection can
//! be loaded from and saved to a JSON-lines snapshot, one document per line.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::document::{Document, FieldUpdate};
use crate::error::{DbError, Result};
use crate::query::{group_key, sort_groups, DocumentQuery, GroupCount, NumericSummary, StageFilter};
use crate::store::DocumentStore;

#[derive(Default)]
struct Inner {
    docs: Vec<Document>,
    positions: HashMap<String, usize>,
}

impl Inner {
    fn push(&mut self, doc: Document) -> bool {
        if self.positions.contains_key(&doc.id) {
            return false;
        }
        self.positions.insert(doc.id.clone(), self.docs.len());
        self.docs.push(doc);
        true
    }
}

/// Ordered in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(docs: impl IntoIterator<Item = Document>) -> Self {
        let mut inner = Inner::default();
        for doc in docs {
            inner.push(doc);
        }
        Self { inner: RwLock::new(inner) }
    }

    /// Load a JSON-lines snapshot. Blank lines are ignored.
    pub async fn load_jsonl(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let mut docs = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(line)?;
            let doc = Document::from_json(value).ok_or_else(|| DbError::InvalidDocument {
                line: idx + 1,
                reason: "not a JSON object".to_string(),
            })?;
            if !doc.has_identity() {
                return Err(DbError::InvalidDocument {
                    line: idx + 1,
                    reason: "missing _id".to_string(),
                });
            }
            docs.push(doc);
        }
        tracing::debug!(path = %path.as_ref().display(), n = docs.len(), "Loaded snapshot");
        Ok(Self::with_documents(docs))
    }

    /// Write every document to a JSON-lines snapshot.
    pub async fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<usize> {
        let inner = self.inner.read().await;
        let mut out = String::new();
        for doc in &inner.docs {
            out.push_str(&serde_json::to_string(&doc.to_json())?);
            out.push('\n');
        }
        tokio::fs::write(path.as_ref(), out).await?;
        Ok(inner.docs.len())
    }

    /// Snapshot of one document.
    pub async fn get(&self, id: &str) -> Option<Document> {
        let inner = self.inner.read().await;
        inner.positions.get(id).map(|&pos| inner.docs[pos].clone())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.docs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, query: &DocumentQuery) -> Result<Vec<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .docs
            .iter()
            .filter(|d| query.matches(d))
            .skip(query.skip)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn update_one(&self, id: &str, update: &FieldUpdate) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let Some(&pos) = inner.positions.get(id) else {
            return Ok(false);
        };
        update.apply(&mut inner.docs[pos].fields);
        Ok(true)
    }

    async fn update_many(&self, filter: &StageFilter, update: &FieldUpdate) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let mut changed = 0;
        for doc in inner.docs.iter_mut().filter(|d| filter.matches(d)) {
            if update.apply(&mut doc.fields) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count(&self, filter: &StageFilter) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.docs.iter().filter(|d| filter.matches(d)).count() as u64)
    }

    async fn aggregate(&self, filter: &StageFilter, group_by: &str) -> Result<Vec<GroupCount>> {
        let inner = self.inner.read().await;
        let mut buckets: HashMap<Option<String>, u64> = HashMap::new();
        for doc in inner.docs.iter().filter(|d| filter.matches(d)) {
            *buckets.entry(group_key(doc.get(group_by))).or_insert(0) += 1;
        }
        let mut groups: Vec<GroupCount> = buckets
            .into_iter()
            .map(|(key, count)| GroupCount { key, count })
            .collect();
        sort_groups(&mut groups);
        Ok(groups)
    }

    async fn numeric_summary(
        &self,
        filter: &StageFilter,
        path: &str,
    ) -> Result<Option<NumericSummary>> {
        let inner = self.inner.read().await;
        let values: Vec<f64> = inner
            .docs
            .iter()
            .filter(|d| filter.matches(d))
            .filter_map(|d| d.get(path).and_then(Value::as_f64))
            .collect();
        if values.is_empty() {
            return Ok(None);
        }
        let sum: f64 = values.iter().sum();
        Ok(Some(NumericSummary {
            count: values.len() as u64,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean: sum / values.len() as f64,
        }))
    }

    async fn insert_many(&self, docs: Vec<Document>) -> Result<usize> {
        let mut inner = self.inner.write().await;
        let mut inserted = 0;
        for doc in docs {
            if !doc.has_identity() {
                return Err(DbError::InvalidQuery("cannot insert a document without identity".into()));
            }
            if inner.push(doc) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}
