//! Test Helpers

use jiff::Timestamp;
use sqlx::{query, query_scalar};

use crate::{
    domain::{
        carts::{
            CartStore, CartsServiceError,
            data::{NewCart, NewCartItem},
            models::{Cart, CartItem, CartItemUuid, CartUuid, Quantity},
        },
        products::ProductUuid,
        users::UserUuid,
    },
    test::TestContext,
};

pub(crate) async fn create_cart(ctx: &TestContext) -> Result<Cart, CartsServiceError> {
    ctx.store
        .create_cart(NewCart {
            uuid: CartUuid::new(),
            user_uuid: UserUuid::new(),
        })
        .await
}

pub(crate) async fn add_item(
    ctx: &TestContext,
    cart: CartUuid,
    product: ProductUuid,
    quantity: i64,
) -> Result<CartItem, CartsServiceError> {
    ctx.store
        .add_item(
            cart,
            NewCartItem {
                uuid: CartItemUuid::new(),
                product_uuid: product,
                quantity: Quantity::new(quantity)?,
            },
        )
        .await
}

/// Insert a catalog row directly; products are not managed through the cart store.
pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price: u64,
) -> Result<ProductUuid, sqlx::Error> {
    let uuid = ProductUuid::new();
    let stored_price =
        i64::try_from(price).map_err(|error| sqlx::Error::Encode(Box::new(error)))?;

    query("INSERT INTO products (uuid, name, price) VALUES ($1, $2, $3)")
        .bind(uuid.into_uuid())
        .bind(name)
        .bind(stored_price)
        .execute(ctx.db.pool())
        .await?;

    Ok(uuid)
}

pub(crate) async fn cart_updated_at(
    ctx: &TestContext,
    cart: CartUuid,
) -> Result<Timestamp, sqlx::Error> {
    let updated_at = query_scalar::<_, jiff_sqlx::Timestamp>(
        "SELECT updated_at FROM carts WHERE uuid = $1",
    )
    .bind(cart.into_uuid())
    .fetch_one(ctx.db.pool())
    .await?;

    Ok(updated_at.to_jiff())
}

pub(crate) async fn count_items(ctx: &TestContext, cart: CartUuid) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT COUNT(*) FROM cart_items WHERE cart_uuid = $1")
        .bind(cart.into_uuid())
        .fetch_one(ctx.db.pool())
        .await
}

pub(crate) async fn min_quantity(ctx: &TestContext) -> Result<Option<i32>, sqlx::Error> {
    query_scalar("SELECT MIN(quantity) FROM cart_items")
        .fetch_one(ctx.db.pool())
        .await
}
