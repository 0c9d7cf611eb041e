//! Get Cart Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
};

/// Get Cart Handler
///
/// Returns a cart with its lines. Unlike the items listing, a cart that does not exist is a
/// 404 rather than an empty list.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart found"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage timed out"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let view = state
        .carts
        .view_cart(cart.into_inner().into())
        .await
        .map_err(into_status_error)?
        .ok_or_else(|| StatusError::not_found().brief("Cart not found"))?;

    Ok(Json(view.into()))
}
