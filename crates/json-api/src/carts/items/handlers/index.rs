//! List Cart Items Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{
        errors::into_status_error,
        responses::{CartItemsResponse, CartLineResponse},
    },
    extensions::*,
};

/// List Cart Items Handler
///
/// Returns the cart's lines joined with their products, oldest first.
#[endpoint(
    tags("carts"),
    summary = "List Cart Items",
    responses(
        (status_code = StatusCode::OK, description = "Cart items, empty when the cart is missing or empty"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage timed out"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartItemsResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let cart_uuid = cart.into_inner();

    let items = state
        .carts
        .get_cart(cart_uuid.into())
        .await
        .map_err(into_status_error)?
        .into_iter()
        .map(CartLineResponse::from)
        .collect();

    Ok(Json(CartItemsResponse { cart_uuid, items }))
}
