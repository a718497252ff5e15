//! The store contract shared by every backend.

use async_trait::async_trait;

use crate::document::{Document, FieldUpdate};
use crate::error::Result;
use crate::query::{DocumentQuery, GroupCount, NumericSummary, StageFilter};

/// Queryable, updatable document collection.
///
/// Updates are idempotent overwrites keyed by identity, so replaying the same
/// update never duplicates storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Up to `query.limit` matching documents in the store's natural order.
    async fn find(&self, query: &DocumentQuery) -> Result<Vec<Document>>;

    /// Apply `update` to one document. Returns false if no document has `id`.
    async fn update_one(&self, id: &str, update: &FieldUpdate) -> Result<bool>;

    /// Apply `update` to every matching document; returns how many changed.
    async fn update_many(&self, filter: &StageFilter, update: &FieldUpdate) -> Result<u64>;

    async fn count(&self, filter: &StageFilter) -> Result<u64>;

    /// Group matching documents by the value at a dotted field path.
    async fn aggregate(&self, filter: &StageFilter, group_by: &str) -> Result<Vec<GroupCount>>;

    /// Summary of a numeric field; `None` when no document carries a number there.
    async fn numeric_summary(
        &self,
        filter: &StageFilter,
        path: &str,
    ) -> Result<Option<NumericSummary>>;

    /// Seed documents; existing identities are left untouched.
    async fn insert_many(&self, docs: Vec<Document>) -> Result<usize>;
}
