use thiserror::Error;

/// Run-level failures of the enrichment pipeline.
///
/// Only `ConnectionFailure` and `Config` are fatal; every other variant is
/// recovered where it happens and surfaces in a stage or index report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    #[error("Document {id} failed: {source}")]
    PerDocumentFailure {
        id: String,
        #[source]
        source: StageError,
    },

    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Bulk protocol failure: {0}")]
    BulkProtocolFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Whether the error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::ConnectionFailure(_) | PipelineError::Config(_))
    }
}

/// Failure of a stage function for a single document.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StageError {
    #[error("transform failed: {0}")]
    Transform(String),

    #[error("commit failed: {0}")]
    Commit(String),

    /// The update matched no document (deleted between query and commit).
    #[error("document vanished before commit")]
    Vanished,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("document has no identity")]
    MissingIdentity,
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_connection_and_config_are_fatal() {
        assert!(PipelineError::ConnectionFailure("refused".into()).is_fatal());
        assert!(PipelineError::Config("bad".into()).is_fatal());
        assert!(!PipelineError::BulkProtocolFailure("500".into()).is_fatal());
        assert!(!PipelineError::Projection(ProjectionError::MissingIdentity).is_fatal());
        let per_doc = PipelineError::PerDocumentFailure {
            id: "42".into(),
            source: StageError::Transform("boom".into()),
        };
        assert!(!per_doc.is_fatal());
    }

    #[test]
    fn test_per_document_message_names_the_document() {
        let err = PipelineError::PerDocumentFailure {
            id: "abc".into(),
            source: StageError::Commit("timeout".into()),
        };
        assert_eq!(err.to_string(), "Document abc failed: commit failed: timeout");
    }
}
