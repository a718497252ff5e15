use thiserror::Error;

use sentryx_common::PipelineError;

/// Failures talking to the search index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Request never completed (DNS, refused connection, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for IndexError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            IndexError::Decode(e.to_string())
        } else {
            IndexError::Transport(e.to_string())
        }
    }
}

impl From<IndexError> for PipelineError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::Transport(msg) => PipelineError::ConnectionFailure(msg),
            other => PipelineError::BulkProtocolFailure(other.to_string()),
        }
    }
}
