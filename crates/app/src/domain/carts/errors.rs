//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::database::DeadlineExceeded;

/// SQLSTATE raised when `statement_timeout` or a cancel request stops a query.
const QUERY_CANCELED: &str = "57014";

/// SQLSTATE raised when a stored quantity would overflow its column.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Caller supplied input that can never succeed. Raised before storage is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingIdentifier(&'static str),

    #[error("quantity must be greater than zero, got {0}")]
    NonPositiveQuantity(i64),

    #[error("quantity {0} exceeds the supported maximum")]
    QuantityTooLarge(i64),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Timeout(#[from] DeadlineExceeded),

    #[error("query cancelled")]
    Cancelled,

    #[error("related resource not found")]
    InvalidReference,

    #[error("constraint violated")]
    ConstraintViolation,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<DeadlineExceeded> for CartsServiceError {
    fn from(error: DeadlineExceeded) -> Self {
        Self::Persistence(PersistenceError::Timeout(error))
    }
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        Self::Persistence(PersistenceError::from(error))
    }
}

impl From<Error> for PersistenceError {
    fn from(error: Error) -> Self {
        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        match database_error.code().as_deref() {
            Some(QUERY_CANCELED) => return Self::Cancelled,
            Some(NUMERIC_VALUE_OUT_OF_RANGE) => return Self::ConstraintViolation,
            _ => {}
        }

        match database_error.kind() {
            ErrorKind::ForeignKeyViolation => Self::InvalidReference,
            ErrorKind::UniqueViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => Self::ConstraintViolation,
            ErrorKind::Other | _ => Self::Sql(error),
        }
    }
}
