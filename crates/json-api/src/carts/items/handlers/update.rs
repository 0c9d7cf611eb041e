//! Decrease Cart Item Handler

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, responses::CartItemResponse},
    extensions::*,
};

/// Decrease Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DecreaseCartItemRequest {
    /// Units to take away
    pub quantity: i64,
}

/// Cart Item Decreased Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemDecreasedResponse {
    /// Whether the product is no longer in the cart
    pub removed: bool,

    /// The remaining item, absent once removed
    pub item: Option<CartItemResponse>,
}

/// Decrease Cart Item Handler
///
/// Quantities never drop below zero; an item that reaches zero is removed. Decreasing a
/// product that is not in the cart reports it as removed.
#[endpoint(
    tags("carts"),
    summary = "Decrease Cart Item",
    responses(
        (status_code = StatusCode::OK, description = "Cart item decreased or removed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage timed out"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    product: PathParam<Uuid>,
    json: JsonBody<DecreaseCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartItemDecreasedResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let item = state
        .carts
        .decrease_item(
            cart.into_inner().into(),
            product.into_inner().into(),
            json.into_inner().quantity,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartItemDecreasedResponse {
        removed: item.is_none(),
        item: item.map(CartItemResponse::from),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use trolley_app::domain::{
        carts::{
            CartsServiceError, MockCartsService, ValidationError,
            models::{CartUuid, Quantity},
        },
        products::ProductUuid,
    };

    use crate::test_helpers::{carts_service, make_item};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(
            carts,
            Router::with_path("carts/{cart}/items/{product}").patch(handler),
        )
    }

    #[tokio::test]
    async fn test_partial_decrease_returns_remaining_item() -> TestResult {
        let cart = CartUuid::new();
        let product = ProductUuid::new();
        let remaining = make_item(cart, product, Quantity::new(2)?);

        let mut carts = MockCartsService::new();

        carts
            .expect_decrease_item()
            .once()
            .withf(move |c, p, by| *c == cart && *p == product && *by == 3)
            .return_once(move |_, _, _| Ok(Some(remaining)));

        let mut res = TestClient::patch(format!("http://example.com/carts/{cart}/items/{product}"))
            .json(&json!({ "quantity": 3 }))
            .send(&make_service(carts))
            .await;

        let body: CartItemDecreasedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!body.removed, "item should remain");
        assert_eq!(body.item.map(|item| item.quantity), Some(2));

        Ok(())
    }

    #[tokio::test]
    async fn test_decrease_to_zero_reports_removed() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_decrease_item()
            .once()
            .return_once(|_, _, _| Ok(None));

        let mut res = TestClient::patch(format!(
            "http://example.com/carts/{}/items/{}",
            CartUuid::new(),
            ProductUuid::new()
        ))
        .json(&json!({ "quantity": 10 }))
        .send(&make_service(carts))
        .await;

        let body: CartItemDecreasedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.removed, "item should be gone");
        assert!(body.item.is_none(), "no item expected, got {:?}", body.item);

        Ok(())
    }

    #[tokio::test]
    async fn test_negative_decrease_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_decrease_item().once().return_once(|_, _, by| {
            Err(CartsServiceError::Validation(
                ValidationError::NonPositiveQuantity(by),
            ))
        });

        let res = TestClient::patch(format!(
            "http://example.com/carts/{}/items/{}",
            CartUuid::new(),
            ProductUuid::new()
        ))
        .json(&json!({ "quantity": -1 }))
        .send(&make_service(carts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
