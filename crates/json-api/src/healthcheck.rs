//! Trolley JSON API Health Handlers

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extensions::*;

/// Health response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

impl HealthResponse {
    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

/// Liveness handler
///
/// Reports that the process is serving requests.
#[endpoint(tags("health"), summary = "Liveness probe")]
pub(crate) async fn live() -> Json<HealthResponse> {
    Json(HealthResponse::new("ok"))
}

/// Readiness handler
///
/// Reports whether the cart database is reachable.
#[endpoint(
    tags("health"),
    summary = "Readiness probe",
    responses(
        (status_code = StatusCode::OK, description = "Database reachable"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Database unreachable"),
    ),
)]
pub(crate) async fn ready(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.state_or_500()?;

    if let Err(error) = state.health.check_database().await {
        warn!("readiness check failed: {error}");

        res.status_code(StatusCode::SERVICE_UNAVAILABLE);

        return Ok(Json(HealthResponse::new("unavailable")));
    }

    Ok(Json(HealthResponse::new("ok")))
}
