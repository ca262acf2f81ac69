//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! SQLite Error (sqlx::Error)
//!      │
//!      ▼
//! DbError (this module) ← Adds context and categorization
//!      │
//!      ▼
//! Caller maps to its external representation (status codes etc.)
//! ```
//!
//! `NotFound` and `EditConflict` are expected, recoverable-by-caller
//! outcomes; everything else is an opaque storage failure the caller
//! decides what to do with. The store never retries internally.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row matches the requested id (or the id is not positive).
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A version-checked update matched zero rows: another writer already
    /// advanced the version. The caller must re-fetch and retry.
    #[error("edit conflict on {entity} {id}: stale version")]
    EditConflict { entity: &'static str, id: i64 },

    /// A sort key outside the safelist reached the store layer.
    ///
    /// Filter validation rejects these earlier; this variant is the
    /// backstop that keeps an unvetted column name out of ORDER BY.
    #[error("sort key not in safelist: {0:?}")]
    InvalidSort(String),

    /// The per-call query deadline elapsed. Partial results are never
    /// returned.
    #[error("query timed out")]
    Timeout,

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        DbError::NotFound { entity, id }
    }

    /// Creates an EditConflict error.
    pub fn edit_conflict(entity: &'static str, id: i64) -> Self {
        DbError::EditConflict { entity, id }
    }

    /// True for the two expected, caller-recoverable outcomes.
    pub fn is_expected(&self) -> bool {
        matches!(self, DbError::NotFound { .. } | DbError::EditConflict { .. })
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// sqlx::Error::Io             → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),
            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DbError::not_found("food", 42);
        assert_eq!(err.to_string(), "food not found: 42");

        let err = DbError::edit_conflict("sale", 7);
        assert_eq!(err.to_string(), "edit conflict on sale 7: stale version");
    }

    #[test]
    fn test_expected_classification() {
        assert!(DbError::not_found("food", 1).is_expected());
        assert!(DbError::edit_conflict("food", 1).is_expected());
        assert!(!DbError::Timeout.is_expected());
        assert!(!DbError::QueryFailed("boom".to_string()).is_expected());
    }
}
