//! Administrative stage reset.

use tracing::{info, instrument};

use sentryx_common::{PipelineError, Result, Stage};
use sentryx_db::{DocumentStore, FieldUpdate, StageFilter};

/// Clear `stage` on every document matching `filter`, along with every stage
/// that consumes its output. Returns the number of documents changed.
///
/// All affected stages are cleared by one update per document, so no
/// document is ever left enriched but not preprocessed.
#[instrument(skip(store))]
pub async fn reset_stage<S>(store: &S, stage: Stage, filter: &StageFilter) -> Result<u64>
where
    S: DocumentStore + ?Sized,
{
    let mut stages = vec![stage];
    stages.extend(stage.dependents());

    let update = stages.iter().fold(FieldUpdate::new(), |acc, s| merge(acc, FieldUpdate::reset(*s)));
    let changed = store
        .update_many(filter, &update)
        .await
        .map_err(|e| PipelineError::ConnectionFailure(e.to_string()))?;

    info!(stages = ?stages, changed, "Stage reset");
    Ok(changed)
}

fn merge(mut into: FieldUpdate, other: FieldUpdate) -> FieldUpdate {
    into.set.extend(other.set);
    into.unset.extend(other.unset);
    into
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentryx_db::{Document, MemoryStore};
    use serde_json::json;

    fn processed(id: &str) -> Document {
        Document::new(id)
            .with("text", "x")
            .with("preprocessed", true)
            .with("preprocessed_at", "2024-01-01T00:00:00+00:00")
            .with("normalized", json!({"processed_text": "x"}))
            .with("enriched", true)
            .with("enriched_at", "2024-01-01T00:00:00+00:00")
            .with("enrichment", json!({}))
    }

    #[tokio::test]
    async fn test_reset_preprocess_cascades_to_enrich() {
        let store = MemoryStore::with_documents(vec![processed("a"), processed("b"), Document::new("c")]);
        let changed = reset_stage(&store, Stage::Preprocess, &StageFilter::all()).await.unwrap();
        assert_eq!(changed, 3);

        let a = store.get("a").await.unwrap();
        assert!(!a.flag(Stage::Preprocess));
        assert!(!a.flag(Stage::Enrich));
        for field in ["normalized", "preprocessed_at", "enrichment", "enriched_at"] {
            assert!(a.get(field).is_none(), "{field} should be cleared");
        }
        assert_eq!(a.raw_text(), Some("x"));
        assert_eq!(store.count(&StageFilter::eligible_for(Stage::Preprocess)).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reset_enrich_keeps_preprocess() {
        let store = MemoryStore::with_documents(vec![processed("a")]);
        let changed = reset_stage(&store, Stage::Enrich, &StageFilter::all()).await.unwrap();
        assert_eq!(changed, 1);

        let a = store.get("a").await.unwrap();
        assert!(a.flag(Stage::Preprocess));
        assert!(!a.flag(Stage::Enrich));
        assert!(a.get("normalized").is_some());
        assert!(a.get("enrichment").is_none());
    }

    #[tokio::test]
    async fn test_reset_twice_changes_nothing_second_time() {
        let store = MemoryStore::with_documents(vec![processed("a")]);
        reset_stage(&store, Stage::Enrich, &StageFilter::all()).await.unwrap();
        assert_eq!(reset_stage(&store, Stage::Enrich, &StageFilter::all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reset_only_touches_matching_documents() {
        let preprocessed_only = Document::new("c")
            .with("text", "y")
            .with("preprocessed", true)
            .with("normalized", json!({"processed_text": "y"}));
        let store = MemoryStore::with_documents(vec![processed("a"), processed("b"), preprocessed_only]);

        let changed = reset_stage(&store, Stage::Preprocess, &StageFilter::completed(&[Stage::Enrich]))
            .await
            .unwrap();
        assert_eq!(changed, 2);

        let c = store.get("c").await.unwrap();
        assert!(c.flag(Stage::Preprocess));
        assert!(c.get("normalized").is_some());
        assert!(!store.get("a").await.unwrap().flag(Stage::Preprocess));
    }
}
