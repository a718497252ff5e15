//! Verification statistics over the document store.

use std::fmt;

use serde::Serialize;
use tracing::instrument;

use sentryx_common::{PipelineError, Result, Stage};
use sentryx_db::{DbError, DocumentStore, GroupCount, NumericSummary, StageFilter};

const TOP_LANGUAGES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineStats {
    pub total: u64,
    pub preprocessed: u64,
    pub enriched: u64,
    /// Most frequent detected languages among enriched documents.
    pub languages: Vec<GroupCount>,
    pub sentiments: Vec<GroupCount>,
    pub token_counts: Option<NumericSummary>,
}

#[instrument(skip(store))]
pub async fn collect_stats<S>(store: &S) -> Result<PipelineStats>
where
    S: DocumentStore + ?Sized,
{
    let preprocessed_filter = StageFilter::completed(&[Stage::Preprocess]);
    let enriched_filter = StageFilter::completed(&[Stage::Enrich]);

    let total = store.count(&StageFilter::all()).await.map_err(store_error)?;
    let preprocessed = store.count(&preprocessed_filter).await.map_err(store_error)?;
    let enriched = store.count(&enriched_filter).await.map_err(store_error)?;

    let mut languages = store
        .aggregate(&enriched_filter, "enrichment.language.code")
        .await
        .map_err(store_error)?;
    languages.truncate(TOP_LANGUAGES);
    let sentiments = store
        .aggregate(&enriched_filter, "enrichment.consensus.label")
        .await
        .map_err(store_error)?;
    let token_counts = store
        .numeric_summary(&preprocessed_filter, "normalized.token_count")
        .await
        .map_err(store_error)?;

    Ok(PipelineStats { total, preprocessed, enriched, languages, sentiments, token_counts })
}

fn store_error(e: DbError) -> PipelineError {
    PipelineError::ConnectionFailure(e.to_string())
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Documents:     {}", self.total)?;
        writeln!(f, "Preprocessed:  {} ({:.1}%)", self.preprocessed, percent(self.preprocessed, self.total))?;
        writeln!(f, "Enriched:      {} ({:.1}%)", self.enriched, percent(self.enriched, self.total))?;

        if let Some(tc) = &self.token_counts {
            writeln!(f, "Tokens/doc:    min {} / max {} / mean {:.1}", tc.min, tc.max, tc.mean)?;
        }

        writeln!(f, "Languages:")?;
        for g in &self.languages {
            writeln!(f, "  {:<10} {}", g.key.as_deref().unwrap_or("(none)"), g.count)?;
        }
        writeln!(f, "Sentiment:")?;
        for g in &self.sentiments {
            writeln!(f, "  {:<10} {}", g.key.as_deref().unwrap_or("(none)"), g.count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentryx_db::{Document, MemoryStore};
    use serde_json::json;

    fn enriched(id: &str, lang: &str, label: &str, tokens: u64) -> Document {
        Document::new(id)
            .with("preprocessed", true)
            .with("normalized", json!({"token_count": tokens}))
            .with("enriched", true)
            .with(
                "enrichment",
                json!({"language": {"code": lang}, "consensus": {"label": label}}),
            )
    }

    #[tokio::test]
    async fn test_collect_stats() {
        let store = MemoryStore::with_documents(vec![
            enriched("a", "en", "negative", 4),
            enriched("b", "en", "positive", 2),
            enriched("c", "fr", "negative", 6),
            Document::new("d").with("preprocessed", true).with("normalized", json!({"token_count": 0})),
            Document::new("e"),
        ]);

        let stats = collect_stats(&store).await.unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.preprocessed, 4);
        assert_eq!(stats.enriched, 3);
        assert_eq!(stats.languages[0], GroupCount { key: Some("en".into()), count: 2 });
        assert_eq!(stats.sentiments[0], GroupCount { key: Some("negative".into()), count: 2 });

        let tc = stats.token_counts.unwrap();
        assert_eq!(tc.count, 4);
        assert_eq!(tc.min, 0.0);
        assert_eq!(tc.max, 6.0);
        assert_eq!(tc.mean, 3.0);
    }

    #[tokio::test]
    async fn test_languages_capped_at_ten() {
        let docs = (0..12).map(|i| enriched(&format!("d{i}"), &format!("l{i:02}"), "neutral", 1));
        let store = MemoryStore::with_documents(docs);
        let stats = collect_stats(&store).await.unwrap();
        assert_eq!(stats.languages.len(), 10);
    }

    #[tokio::test]
    async fn test_display_on_empty_store() {
        let stats = collect_stats(&MemoryStore::new()).await.unwrap();
        let text = stats.to_string();
        assert!(text.contains("Documents:     0"));
        assert!(text.contains("Preprocessed:  0 (0.0%)"));
    }
}
