//! sentryx-common: Shared types and the error taxonomy used across all sentryx crates.

pub mod error;
pub mod stage;

// Re-export commonly used types
pub use error::{PipelineError, ProjectionError, Result, StageError};
pub use stage::Stage;
