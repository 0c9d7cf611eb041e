//! Cart Data

use crate::domain::{
    carts::models::{CartItemUuid, CartUuid, Quantity},
    products::ProductUuid,
    users::UserUuid,
};

/// Request to open a cart for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateCart {
    pub user_uuid: UserUuid,
}

/// Request to add a product to a cart. The quantity is unchecked until validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: i64,
}

/// New Cart Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCart {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
}

/// New Cart Item Data
///
/// `uuid` is only used when no row exists yet for the cart and product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: Quantity,
}
