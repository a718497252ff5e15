//! Store selection for the binary.

use std::path::PathBuf;

use tracing::{info, warn};

use sentryx_config::{StoreBackend, StoreConfig};
use sentryx_db::{DocumentStore, MemoryStore, PgDocumentStore};

pub enum Backend {
    Memory {
        store: MemoryStore,
        snapshot: Option<PathBuf>,
    },
    Postgres(PgDocumentStore),
}

impl Backend {
    pub async fn open(cfg: &StoreConfig) -> anyhow::Result<Self> {
        match cfg.backend {
            StoreBackend::Memory => {
                let snapshot = cfg.snapshot_path.clone();
                let store = match &snapshot {
                    Some(path) if path.exists() => MemoryStore::load_jsonl(path).await?,
                    Some(path) => {
                        warn!(path = %path.display(), "Snapshot not found, starting empty");
                        MemoryStore::new()
                    }
                    None => {
                        warn!("No snapshot_path configured; the memory store starts empty and is not saved");
                        MemoryStore::new()
                    }
                };
                info!(documents = store.len().await, "Memory store ready");
                Ok(Backend::Memory { store, snapshot })
            }
            StoreBackend::Postgres => {
                let store = PgDocumentStore::connect(&cfg.url, &cfg.table).await?;
                store.initialize().await?;
                Ok(Backend::Postgres(store))
            }
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        match self {
            Backend::Memory { store, .. } => store,
            Backend::Postgres(store) => store,
        }
    }

    /// Write the memory store back to its snapshot. Postgres commits as it goes.
    pub async fn persist(&self) -> anyhow::Result<()> {
        if let Backend::Memory { store, snapshot: Some(path) } = self {
            let n = store.save_jsonl(path).await?;
            info!(path = %path.display(), documents = n, "Snapshot saved");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sentryx_common::Stage;
    use sentryx_db::{Document, StageFilter};

    fn memory_config(snapshot: Option<PathBuf>) -> StoreConfig {
        StoreConfig { backend: StoreBackend::Memory, snapshot_path: snapshot, ..StoreConfig::default() }
    }

    #[tokio::test]
    async fn test_missing_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Backend::open(&memory_config(Some(dir.path().join("posts.jsonl"))))
            .await
            .unwrap();
        assert_eq!(backend.store().count(&StageFilter::all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_persist_round_trips_through_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.jsonl");

        let backend = Backend::open(&memory_config(Some(path.clone()))).await.unwrap();
        backend
            .store()
            .insert_many(vec![Document::new("a").with("text", "hello"), Document::new("b")])
            .await
            .unwrap();
        backend.persist().await.unwrap();

        let reopened = Backend::open(&memory_config(Some(path))).await.unwrap();
        let store = reopened.store();
        assert_eq!(store.count(&StageFilter::all()).await.unwrap(), 2);
        assert_eq!(store.count(&StageFilter::eligible_for(Stage::Preprocess)).await.unwrap(), 2);
    }
}
