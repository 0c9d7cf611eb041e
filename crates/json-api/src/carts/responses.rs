//! Cart Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley_app::domain::carts::models::{CartItem, CartLine, CartView};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The user owning the cart
    pub user_uuid: Uuid,

    /// Lifecycle status: `active`, `checked_out` or `abandoned`
    pub status: String,

    /// The cart's lines, oldest first
    pub items: Vec<CartLineResponse>,

    /// Sum of every line total in minor currency units
    pub subtotal: u64,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        let subtotal = view.subtotal();
        let CartView { cart, items } = view;

        Self {
            uuid: cart.uuid.into(),
            user_uuid: cart.user_uuid.into(),
            status: cart.status.to_string(),
            items: items.into_iter().map(CartLineResponse::from).collect(),
            subtotal,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// The unique identifier of the cart item
    pub item_uuid: Uuid,

    /// The product in the line
    pub product_uuid: Uuid,

    /// The product's name
    pub product_name: String,

    /// Unit price in minor currency units
    pub price: u64,

    /// Units of the product in the cart
    pub quantity: i32,

    /// `price * quantity`
    pub total: u64,

    /// The date and time the item was first added
    pub created_at: String,

    /// The date and time the item was last changed
    pub updated_at: String,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            total: line.total(),
            item_uuid: line.item_uuid.into(),
            product_uuid: line.product_uuid.into(),
            product_name: line.product_name,
            price: line.price,
            quantity: line.quantity.get(),
            created_at: line.created_at.to_string(),
            updated_at: line.updated_at.to_string(),
        }
    }
}

/// Cart Items Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemsResponse {
    /// The cart that was read
    pub cart_uuid: Uuid,

    /// The cart's lines, oldest first. Empty for missing and empty carts alike.
    pub items: Vec<CartLineResponse>,
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The cart holding the item
    pub cart_uuid: Uuid,

    /// The product in the item
    pub product_uuid: Uuid,

    /// Units of the product in the cart
    pub quantity: i32,

    /// The date and time the item was first added
    pub created_at: String,

    /// The date and time the item was last changed
    pub updated_at: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            uuid: item.uuid.into(),
            cart_uuid: item.cart_uuid.into(),
            product_uuid: item.product_uuid.into(),
            quantity: item.quantity.get(),
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}
