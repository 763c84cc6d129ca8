//! Error types for query execution.

use taskboard_model::error::StoreError;
use thiserror::Error;

/// A specialized Result type for query execution.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while running a composed query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The database rejected or failed the statement.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A collaborator lookup (permissions, board) failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
