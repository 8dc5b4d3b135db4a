//! Error conversion glue between the layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions from [`TypeConstraintError`] live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
use crate::services::errors::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        match val {
            TypeConstraintError::InvalidPagination(_) => {
                ServiceError::InvalidArgument(val.to_string())
            }
            _ => ServiceError::Validation(val.to_string()),
        }
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        match val {
            TypeConstraintError::InvalidPagination(_) => {
                RepositoryError::InvalidArgument(val.to_string())
            }
            _ => RepositoryError::ValidationError(val.to_string()),
        }
    }
}
