//! Create Cart Handler

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley_app::domain::carts::data::CreateCart;

use crate::{carts::errors::into_status_error, extensions::*};

/// Create Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartRequest {
    /// The user the cart belongs to
    pub user_uuid: Uuid,
}

impl From<CreateCartRequest> for CreateCart {
    fn from(request: CreateCartRequest) -> Self {
        CreateCart {
            user_uuid: request.user_uuid.into(),
        }
    }
}

/// Cart Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartCreatedResponse {
    /// Created cart UUID
    pub uuid: Uuid,
}

/// Create Cart Handler
#[endpoint(
    tags("carts"),
    summary = "Create Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Cart created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage timed out"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCartRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartCreatedResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let uuid = state
        .carts
        .create_cart(json.into_inner().into())
        .await
        .map_err(into_status_error)?
        .uuid;

    res.add_header(LOCATION, format!("/carts/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(CartCreatedResponse { uuid: uuid.into() }))
}
