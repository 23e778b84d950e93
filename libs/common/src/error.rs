//! Custom error types for the common library
//!
//! This module defines the database error type shared by every service.
//! Repository code converts `sqlx` errors with `?`, and unique-constraint
//! violations are kept apart so the HTTP layer can report them as conflicts.

use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A write referenced a row that no longer exists
    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(#[from] MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl From<SqlxError> for DatabaseError {
    fn from(error: SqlxError) -> Self {
        if let SqlxError::Database(db_error) = &error {
            let constraint = db_error.constraint().unwrap_or("unknown").to_string();
            if db_error.is_unique_violation() {
                return DatabaseError::UniqueViolation { constraint };
            }
            if db_error.is_foreign_key_violation() {
                return DatabaseError::ForeignKeyViolation { constraint };
            }
        }

        DatabaseError::Query(error)
    }
}

impl DatabaseError {
    /// Whether this error came from a unique constraint
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation { .. })
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
