use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// True for duplicate inserts, whether reported by the gateway itself or
    /// by PostgreSQL (SQLSTATE 23505).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StorageError::UniqueViolation(_) => true,
            StorageError::Database(sqlx::Error::Database(e)) => {
                e.code().as_deref() == Some("23505")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_unique_violation_is_recognised() {
        let err = StorageError::UniqueViolation("golfers.api_id = 42".to_string());
        assert!(err.is_unique_violation());
    }

    #[test]
    fn other_errors_are_not_unique_violations() {
        assert!(!StorageError::NotFound.is_unique_violation());
        assert!(!StorageError::ConstraintViolation("rating".to_string()).is_unique_violation());
    }
}
