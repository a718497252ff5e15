//! sentryx Document Store layer
//!
//! The pipeline talks to its store through the [`DocumentStore`] trait only:
//! predicate retrieval bounded by a page size, partial update by identity,
//! and aggregate counting / grouping. Two backends are provided:
//!
//! - [`MemoryStore`]: ordered in-process store with JSON-lines snapshots
//! - [`PgDocumentStore`]: PostgreSQL table of JSONB documents
//!
//! # Example
//!
//! ```rust,no_run
//! use sentryx_db::{DocumentStore, MemoryStore, DocumentQuery, StageFilter};
//! use sentryx_common::Stage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::load_jsonl("./data/posts.jsonl").await?;
//!     let pending = store
//!         .find(&DocumentQuery::page(StageFilter::eligible_for(Stage::Preprocess), 100))
//!         .await?;
//!     println!("{} documents waiting", pending.len());
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod store;

pub use document::{Document, FieldUpdate, ID_FIELD, TEXT_FIELD};
pub use error::{DbError, Result};
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
pub use query::{DocumentQuery, GroupCount, NumericSummary, StageFilter};
pub use store::DocumentStore;
