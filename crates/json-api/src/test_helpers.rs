//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use trolley_app::domain::{
    carts::{
        MockCartsService,
        models::{Cart, CartItem, CartItemUuid, CartLine, CartStatus, CartUuid, Quantity},
    },
    health::MockHealthService,
    products::ProductUuid,
    users::UserUuid,
};

use crate::{config::observability::RequestLogSettings, state::State};

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_create_cart().never();
    carts.expect_add_item().never();
    carts.expect_decrease_item().never();
    carts.expect_remove_item().never();
    carts.expect_get_cart().never();
    carts.expect_view_cart().never();
    carts.expect_empty_cart().never();

    carts
}

fn strict_health_mock() -> MockHealthService {
    let mut health = MockHealthService::new();

    health.expect_check_database().never();

    health
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(carts),
        Arc::new(strict_health_mock()),
        RequestLogSettings::default(),
    ))
}

pub(crate) fn state_with_health(health: MockHealthService) -> Arc<State> {
    Arc::new(State::new(
        Arc::new(strict_carts_mock()),
        Arc::new(health),
        RequestLogSettings::default(),
    ))
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .push(route),
    )
}

pub(crate) fn health_service(health: MockHealthService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_health(health)))
            .push(route),
    )
}

pub(crate) fn make_cart(uuid: CartUuid) -> Cart {
    Cart {
        uuid,
        user_uuid: UserUuid::new(),
        status: CartStatus::Active,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_item(cart: CartUuid, product: ProductUuid, quantity: Quantity) -> CartItem {
    CartItem {
        uuid: CartItemUuid::new(),
        cart_uuid: cart,
        product_uuid: product,
        quantity,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_line(name: &str, price: u64, quantity: Quantity) -> CartLine {
    CartLine {
        item_uuid: CartItemUuid::new(),
        product_uuid: ProductUuid::new(),
        quantity,
        product_name: name.to_string(),
        price,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
