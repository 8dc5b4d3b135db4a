//! Errors surfaced by the Diesel-backed query layer.

use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Client not found")]
    NotFound,

    #[error("Expected a single client, found {0}")]
    NonUniqueResult(usize),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Names the `clients` column whose CHECK rule rejected the row.
fn check_violation(info: &dyn DatabaseErrorInformation) -> String {
    let message = info.message();
    let rule = info.constraint_name().unwrap_or(message);
    if rule.contains("income") {
        "client income must not be negative".to_string()
    } else if rule.contains("children") {
        "client children count must not be negative".to_string()
    } else {
        format!("check constraint failed: {message}")
    }
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,

            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                RepositoryError::ConstraintViolation(check_violation(info.as_ref()))
            }

            DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, info) => {
                RepositoryError::ConstraintViolation(format!(
                    "missing required client field: {}",
                    info.message()
                ))
            }

            DieselError::DeserializationError(e) => {
                RepositoryError::ValidationError(format!("Stored client row is unreadable: {e}"))
            }

            other => RepositoryError::DatabaseError(other.to_string()),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        RepositoryError::ConnectionError(err.to_string())
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        RepositoryError::ConnectionError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        assert!(matches!(
            RepositoryError::from(DieselError::NotFound),
            RepositoryError::NotFound
        ));
    }

    #[test]
    fn other_diesel_errors_map_to_database_error() {
        assert!(matches!(
            RepositoryError::from(DieselError::RollbackTransaction),
            RepositoryError::DatabaseError(_)
        ));
        assert!(matches!(
            RepositoryError::from(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                Box::new("UNIQUE constraint failed: clients.id".to_string()),
            )),
            RepositoryError::DatabaseError(_)
        ));
    }

    #[test]
    fn check_violation_names_the_client_column() {
        let err = RepositoryError::from(DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new("CHECK constraint failed: children >= 0".to_string()),
        ));
        match err {
            RepositoryError::ConstraintViolation(message) => {
                assert_eq!(message, "client children count must not be negative")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
