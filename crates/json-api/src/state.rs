//! State

use std::sync::Arc;

use trolley_app::{
    context::AppContext,
    domain::{carts::CartsService, health::HealthService},
};

use crate::config::observability::RequestLogSettings;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) carts: Arc<dyn CartsService>,
    pub(crate) health: Arc<dyn HealthService>,
    pub(crate) request_log: RequestLogSettings,
}

impl State {
    #[must_use]
    pub(crate) fn new(
        carts: Arc<dyn CartsService>,
        health: Arc<dyn HealthService>,
        request_log: RequestLogSettings,
    ) -> Self {
        Self {
            carts,
            health,
            request_log,
        }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: &AppContext, request_log: RequestLogSettings) -> Arc<Self> {
        Arc::new(Self::new(
            Arc::clone(&app.carts),
            Arc::clone(&app.health),
            request_log,
        ))
    }
}
