//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{AddCartItem, CreateCart, NewCart, NewCartItem},
            errors::{CartsServiceError, ValidationError},
            models::{Cart, CartItem, CartItemUuid, CartLine, CartUuid, CartView, Quantity},
            store::{CartStore, PgCartStore},
        },
        products::ProductUuid,
        users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Validates requests, then makes exactly one attempt against the store.
#[derive(Clone)]
pub struct ValidatingCartsService {
    store: Arc<dyn CartStore>,
}

impl std::fmt::Debug for ValidatingCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatingCartsService").finish_non_exhaustive()
    }
}

impl ValidatingCartsService {
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>) -> Self {
        Self { store }
    }

    /// Service backed by the `PostgreSQL` store.
    #[must_use]
    pub fn postgres(db: Db) -> Self {
        Self::new(Arc::new(PgCartStore::new(db)))
    }
}

fn require<T>(uuid: TypedUuid<T>, field: &'static str) -> Result<TypedUuid<T>, ValidationError> {
    if uuid.is_nil() {
        return Err(ValidationError::MissingIdentifier(field));
    }

    Ok(uuid)
}

#[async_trait]
impl CartsService for ValidatingCartsService {
    async fn create_cart(&self, cart: CreateCart) -> Result<Cart, CartsServiceError> {
        let user_uuid: UserUuid = require(cart.user_uuid, "user_uuid")?;

        self.store
            .create_cart(NewCart {
                uuid: CartUuid::new(),
                user_uuid,
            })
            .await
    }

    async fn add_item(
        &self,
        cart: CartUuid,
        item: AddCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        let cart = require(cart, "cart_uuid")?;
        let product_uuid = require(item.product_uuid, "product_uuid")?;
        let quantity = Quantity::new(item.quantity)?;

        self.store
            .add_item(
                cart,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid,
                    quantity,
                },
            )
            .await
    }

    async fn decrease_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
        by: i64,
    ) -> Result<Option<CartItem>, CartsServiceError> {
        let cart = require(cart, "cart_uuid")?;
        let product = require(product, "product_uuid")?;
        let by = Quantity::new(by)?;

        self.store.decrease_item(cart, product, by).await
    }

    async fn remove_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError> {
        let cart = require(cart, "cart_uuid")?;
        let product = require(product, "product_uuid")?;

        self.store.remove_item(cart, product).await
    }

    async fn get_cart(&self, cart: CartUuid) -> Result<Vec<CartLine>, CartsServiceError> {
        let cart = require(cart, "cart_uuid")?;

        self.store.get_cart(cart).await
    }

    async fn view_cart(&self, cart: CartUuid) -> Result<Option<CartView>, CartsServiceError> {
        let cart = require(cart, "cart_uuid")?;

        self.store.view_cart(cart).await
    }

    async fn empty_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError> {
        let cart = require(cart, "cart_uuid")?;

        self.store.empty_cart(cart).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Open a new active cart for the user.
    async fn create_cart(&self, cart: CreateCart) -> Result<Cart, CartsServiceError>;

    /// Add a product to the cart, merging with any existing quantity.
    async fn add_item(
        &self,
        cart: CartUuid,
        item: AddCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Decrease a product's quantity, removing it once nothing remains.
    async fn decrease_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
        by: i64,
    ) -> Result<Option<CartItem>, CartsServiceError>;

    /// Remove a product from the cart. Removing an absent product succeeds.
    async fn remove_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError>;

    /// The cart's lines, oldest first. Empty for missing and empty carts alike.
    async fn get_cart(&self, cart: CartUuid) -> Result<Vec<CartLine>, CartsServiceError>;

    /// The cart with its lines, or `None` when it does not exist.
    async fn view_cart(&self, cart: CartUuid) -> Result<Option<CartView>, CartsServiceError>;

    /// Remove every item from the cart.
    async fn empty_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError>;
}
