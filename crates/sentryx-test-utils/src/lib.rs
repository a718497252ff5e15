//! Shared fixtures and test doubles.
//!
//! - [`fixtures`]: document builders and a small sample corpus
//! - [`store`]: a store wrapper that injects failures
//! - [`index`]: an in-memory search index that records every write

pub mod fixtures;
pub mod index;
pub mod store;

pub use fixtures::{post, sample_posts, seeded_store};
pub use index::{BulkBehaviour, RecordingIndex};
pub use store::FlakyStore;
