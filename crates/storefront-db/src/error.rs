//! # Database Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Schema check (storefront-core)     SQLite Error (sqlx::Error)         │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError::Validation               DbError::UniqueViolation / ...      │
//! │       │                                   │                             │
//! │       └──────────────┬────────────────────┘                             │
//! │                      ▼                                                  │
//! │            caller of the write (unseen API layer)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::{CoreError, ValidationError};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Document failed its schema at write time.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique index violation.
    ///
    /// ## When This Occurs
    /// - Second cart for the same `userId`
    /// - Category with an existing `name` or `slug`
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A stored row could not be turned back into a document.
    #[error("Corrupt {entity} document: {reason}")]
    CorruptDocument { entity: String, reason: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn corrupt(entity: impl Into<String>, reason: impl ToString) -> Self {
        DbError::CorruptDocument {
            entity: entity.into(),
            reason: reason.to_string(),
        }
    }

    /// Fills in the offending value of a UniqueViolation.
    ///
    /// SQLite reports only `table.column`; repositories know the document
    /// field and value. `lookup` maps a column to `(field, value)`.
    pub(crate) fn with_duplicate_value<F>(self, lookup: F) -> Self
    where
        F: FnOnce(&str) -> Option<(&'static str, String)>,
    {
        match self {
            DbError::UniqueViolation { field, value } => match lookup(&field) {
                Some((doc_field, value)) => DbError::duplicate(doc_field, value),
                None => DbError::UniqueViolation { field, value },
            },
            other => other,
        }
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => DbError::Validation(e),
            CoreError::Hydration { model, reason } => DbError::CorruptDocument {
                entity: model,
                reason,
            },
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                if let Some(target) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    let column = target.rsplit('.').next().unwrap_or(target).to_string();
                    DbError::UniqueViolation {
                        field: column,
                        value: "unknown".to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

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
    fn test_duplicate_value_is_filled_from_column() {
        let err = DbError::UniqueViolation {
            field: "user_id".to_string(),
            value: "unknown".to_string(),
        };

        let err = err.with_duplicate_value(|column| match column {
            "user_id" => Some(("userId", "u1".to_string())),
            _ => None,
        });

        assert_eq!(err.to_string(), "Duplicate userId: 'u1' already exists");
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = DbError::not_found("Cart", "c1").with_duplicate_value(|_| None);
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_core_errors_map() {
        let err: DbError = CoreError::Validation(ValidationError::Required {
            field: "slug".to_string(),
        })
        .into();
        assert!(matches!(err, DbError::Validation(_)));

        let err: DbError = CoreError::Hydration {
            model: "Cart".to_string(),
            reason: "bad".to_string(),
        }
        .into();
        assert!(matches!(err, DbError::CorruptDocument { .. }));
    }
}
