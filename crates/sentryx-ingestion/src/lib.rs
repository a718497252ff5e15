//! sentryx-ingestion: Staged enrichment of stored posts and their projection
//! into a search index.
//!
//! Flow for a full run:
//!   1. `preprocess` stage: normalise raw text of every pending document
//!   2. `enrich` stage: language + sentiment + consensus on preprocessed documents
//!   3. indexing: project enriched documents and bulk-write them
//!
//! Each stage is driven by [`scheduler::run_stage`], which pages through
//! eligible documents and commits one document at a time. Re-running a stage
//! only touches documents that are still pending.

pub mod error;
pub mod index_writer;
pub mod pipeline;
pub mod projector;
pub mod reset;
pub mod scheduler;
pub mod search;
pub mod stages;
pub mod stats;

pub use error::IndexError;
pub use index_writer::{bulk_write, BulkItemResult, BulkOutcome, FailedItem, IndexAction, SearchIndex, WriteTier};
pub use pipeline::{index_documents, run_all, IndexReport, RunReport};
pub use projector::{project, ProjectionRecord};
pub use reset::reset_stage;
pub use scheduler::{run_stage, StageReport, StageTransform};
pub use search::ElasticsearchIndex;
pub use stages::{enrich_stage, preprocess_stage, Enricher, Preprocessor};
pub use stats::{collect_stats, PipelineStats};
