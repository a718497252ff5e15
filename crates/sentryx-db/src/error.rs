//! Database error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document at line {line}: {reason}")]
    InvalidDocument { line: usize, reason: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl DbError {
    /// Whether the error means the store itself is unreachable.
    pub fn is_connection(&self) -> bool {
        match self {
            DbError::Connection(_) => true,
            DbError::Postgres(e) => e.is_closed(),
            _ => false,
        }
    }
}
