//! Add Cart Item Handler

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley_app::domain::carts::data::AddCartItem;

use crate::{
    carts::{errors::into_status_error, responses::CartItemResponse},
    extensions::*,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// The product to add
    pub product_uuid: Uuid,

    /// Units to add; merged with any quantity already in the cart
    pub quantity: i64,
}

impl From<AddCartItemRequest> for AddCartItem {
    fn from(request: AddCartItemRequest) -> Self {
        AddCartItem {
            product_uuid: request.product_uuid.into(),
            quantity: request.quantity,
        }
    }
}

/// Add Cart Item Handler
///
/// Adding a product that is already in the cart increases its quantity.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart item added or merged"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Merged quantity out of range"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage timed out"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.create",
    skip(cart, json, depot, res),
    fields(
        cart_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let request = json.into_inner();
    let cart = cart.into_inner();

    let span = tracing::Span::current();

    span.record("cart_uuid", tracing::field::display(cart));
    span.record("product_uuid", tracing::field::display(request.product_uuid));
    span.record("quantity", request.quantity);

    let item = state
        .carts
        .add_item(cart.into(), request.into())
        .await
        .map_err(into_status_error)?;

    res.add_header(
        LOCATION,
        format!("/carts/{cart}/items/{}", item.product_uuid),
        true,
    )
    .or_500("failed to set location header")?;

    tracing::info!(quantity = item.quantity.get(), "added cart item");

    Ok(Json(item.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use trolley_app::domain::{
        carts::{
            CartsServiceError, MockCartsService, PersistenceError, ValidationError,
            models::{CartUuid, Quantity},
        },
        products::ProductUuid,
    };

    use crate::test_helpers::{carts_service, make_item};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("carts/{cart}/items").post(handler))
    }

    #[tokio::test]
    async fn test_add_item_returns_merged_item() -> TestResult {
        let cart = CartUuid::new();
        let product = ProductUuid::new();
        let merged = make_item(cart, product, Quantity::new(5)?);

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |c, item| {
                *c == cart
                    && *item
                        == AddCartItem {
                            product_uuid: product,
                            quantity: 3,
                        }
            })
            .return_once(move |_, _| Ok(merged));

        let mut res = TestClient::post(format!("http://example.com/carts/{cart}/items"))
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 3 }))
            .send(&make_service(carts))
            .await;

        let body: CartItemResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            location,
            Some(format!("/carts/{cart}/items/{product}").as_str())
        );
        assert_eq!(body.quantity, 5);
        assert_eq!(body.product_uuid, product.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_non_positive_quantity_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().once().return_once(|_, item| {
            Err(CartsServiceError::Validation(
                ValidationError::NonPositiveQuantity(item.quantity),
            ))
        });

        let res = TestClient::post(format!("http://example.com/carts/{}/items", CartUuid::new()))
            .json(&json!({ "product_uuid": ProductUuid::new().into_uuid(), "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_to_missing_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(PersistenceError::InvalidReference.into()));

        let res = TestClient::post(format!("http://example.com/carts/{}/items", CartUuid::new()))
            .json(&json!({ "product_uuid": ProductUuid::new().into_uuid(), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_merge_overflow_returns_409() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(PersistenceError::ConstraintViolation.into()));

        let res = TestClient::post(format!("http://example.com/carts/{}/items", CartUuid::new()))
            .json(&json!({ "product_uuid": ProductUuid::new().into_uuid(), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
