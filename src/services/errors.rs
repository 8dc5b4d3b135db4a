//! Errors returned by the service layer.

use thiserror::Error;
use validator::ValidationErrors;

use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested client does not exist.
    #[error("Resource not found")]
    NotFound,

    /// A delete affected no rows.
    #[error("No entity affected by the operation")]
    EmptyResult,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => {
                ServiceError::ConstraintViolation(message)
            }
            RepositoryError::InvalidArgument(message) => ServiceError::InvalidArgument(message),
            RepositoryError::ValidationError(message) => ServiceError::Validation(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}
