use std::time::Duration;
use thiserror::Error as ThisError;

/// Connection-level storage failure; the whole page is abandoned.
#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("database connect failed: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database connect timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failure of a single record; the rest of the batch is unaffected.
#[derive(Debug, ThisError)]
pub enum RowError {
    #[error("malformed project record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("insert rejected: {0}")]
    Storage(#[from] sqlx::Error),
}
