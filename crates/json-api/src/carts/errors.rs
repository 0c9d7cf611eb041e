//! Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use trolley_app::domain::carts::{CartsServiceError, PersistenceError};

use crate::observability::observe_cart_error;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::Validation(source) => {
            observe_cart_error("validation");

            StatusError::bad_request().brief(source.to_string())
        }
        CartsServiceError::Persistence(PersistenceError::InvalidReference) => {
            observe_cart_error("invalid_reference");

            StatusError::not_found().brief("Cart not found")
        }
        CartsServiceError::Persistence(PersistenceError::ConstraintViolation) => {
            observe_cart_error("constraint_violation");

            StatusError::conflict().brief("Cart item conflicts with stored data")
        }
        CartsServiceError::Persistence(PersistenceError::Timeout(source)) => {
            observe_cart_error("timeout");
            warn!("{source}");

            StatusError::service_unavailable().brief("Cart storage timed out")
        }
        CartsServiceError::Persistence(PersistenceError::Cancelled) => {
            observe_cart_error("cancelled");
            warn!("cart query cancelled by the database");

            StatusError::service_unavailable().brief("Cart storage timed out")
        }
        CartsServiceError::Persistence(PersistenceError::Sql(source)) => {
            observe_cart_error("sql");
            error!("cart storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
