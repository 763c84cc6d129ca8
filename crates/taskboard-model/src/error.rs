//! Error types for the persistence layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or writing the database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite driver error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A schema migration failed.
    #[error("migration {version} failed: {source}")]
    Migration {
        /// The migration version that failed.
        version: u32,
        /// The underlying driver error.
        #[source]
        source: rusqlite::Error,
    },

    /// The database schema is newer than this binary understands.
    #[error("database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema {
        /// Version stored in the database.
        found: u32,
        /// Latest version known to this build.
        supported: u32,
    },

    /// A persisted value could not be interpreted.
    #[error("invalid persisted data: {0}")]
    InvalidData(String),

    /// JSON encoding of an activity snapshot failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A write referenced a column the store does not allow changing.
    #[error("field '{0}' cannot be changed")]
    ReadOnlyField(String),
}

impl StoreError {
    /// Creates an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        StoreError::InvalidData(message.into())
    }

    /// Returns true if the error is a uniqueness or foreign key violation.
    ///
    /// These are the failures a caller can trigger with bad input, as opposed
    /// to I/O or schema problems.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
