//! Depot helper extensions.

use std::{any::Any, sync::Arc};

use salvo::prelude::{Depot, StatusError};

use crate::state::State;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Shared application state injected at the router root.
    fn state_or_500(&self) -> Result<Arc<State>, StatusError> {
        self.obtain_or_500::<Arc<State>>().map(Arc::clone)
    }
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>().map_err(|_ignored| {
            tracing::error!(
                type_name = std::any::type_name::<T>(),
                "missing depot value"
            );

            StatusError::internal_server_error()
        })
    }
}
