//! Empty Cart Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*};

/// Empty Cart Handler
///
/// Removes every item from the cart and bumps its `updated_at`.
#[endpoint(
    tags("carts"),
    summary = "Empty Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart emptied"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage timed out"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    )
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.state_or_500()?;

    state
        .carts
        .empty_cart(cart.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use trolley_app::domain::carts::{MockCartsService, models::CartUuid};

    use crate::test_helpers::carts_service;

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("carts/{cart}/items").delete(handler))
    }

    #[tokio::test]
    async fn test_empty_cart_success() -> TestResult {
        let cart = CartUuid::new();
        let mut carts = MockCartsService::new();

        carts
            .expect_empty_cart()
            .once()
            .withf(move |c| *c == cart)
            .return_once(|_| Ok(()));

        let res = TestClient::delete(format!("http://example.com/carts/{cart}/items"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
