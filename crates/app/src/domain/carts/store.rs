//! Cart store.
//!
//! Each operation is one transaction bounded by the storage deadline. Nothing here checks
//! caller input beyond what [`Quantity`] already guarantees.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{NewCart, NewCartItem},
            errors::CartsServiceError,
            models::{Cart, CartItem, CartLine, CartUuid, CartView, Quantity},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::ProductUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartStore {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    #[tracing::instrument(name = "cart_store.create_cart", skip(self), err)]
    async fn create_cart(&self, cart: NewCart) -> Result<Cart, CartsServiceError> {
        self.db
            .within_deadline("create_cart", async {
                let mut tx = self.db.begin_transaction().await?;

                let created = self.carts_repository.create_cart(&mut tx, cart).await?;

                tx.commit().await?;

                Ok::<_, CartsServiceError>(created)
            })
            .await
    }

    #[tracing::instrument(name = "cart_store.add_item", skip(self), err)]
    async fn add_item(
        &self,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        self.db
            .within_deadline("add_item", async {
                let mut tx = self.db.begin_transaction().await?;

                let merged = self.items_repository.upsert_item(&mut tx, cart, item).await?;

                self.carts_repository.touch_cart(&mut tx, cart).await?;

                tx.commit().await?;

                Ok::<_, CartsServiceError>(merged)
            })
            .await
    }

    #[tracing::instrument(name = "cart_store.decrease_item", skip(self), err)]
    async fn decrease_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
        by: Quantity,
    ) -> Result<Option<CartItem>, CartsServiceError> {
        self.db
            .within_deadline("decrease_item", async {
                let mut tx = self.db.begin_transaction().await?;

                let current = self
                    .items_repository
                    .lock_item(&mut tx, cart, product)
                    .await?;

                let remaining = match current {
                    None => None,
                    Some(item) => Some(i64::from(item.quantity) - i64::from(by)),
                };

                let updated = match remaining {
                    None => None,
                    Some(remaining) if remaining <= 0 => {
                        self.items_repository
                            .delete_item(&mut tx, cart, product)
                            .await?;

                        None
                    }
                    Some(remaining) => {
                        let quantity = Quantity::new(remaining)?;

                        Some(
                            self.items_repository
                                .set_quantity(&mut tx, cart, product, quantity)
                                .await?,
                        )
                    }
                };

                if remaining.is_some() {
                    self.carts_repository.touch_cart(&mut tx, cart).await?;
                }

                tx.commit().await?;

                Ok::<_, CartsServiceError>(updated)
            })
            .await
    }

    #[tracing::instrument(name = "cart_store.remove_item", skip(self), err)]
    async fn remove_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError> {
        self.db
            .within_deadline("remove_item", async {
                let mut tx = self.db.begin_transaction().await?;

                let rows_affected = self
                    .items_repository
                    .delete_item(&mut tx, cart, product)
                    .await?;

                if rows_affected > 0 {
                    self.carts_repository.touch_cart(&mut tx, cart).await?;
                }

                tx.commit().await?;

                Ok::<_, CartsServiceError>(())
            })
            .await
    }

    #[tracing::instrument(name = "cart_store.get_cart", skip(self), err)]
    async fn get_cart(&self, cart: CartUuid) -> Result<Vec<CartLine>, CartsServiceError> {
        self.db
            .within_deadline("get_cart", async {
                let mut tx = self.db.begin_transaction().await?;

                let lines = self.items_repository.get_cart_lines(&mut tx, cart).await?;

                tx.commit().await?;

                Ok::<_, CartsServiceError>(lines)
            })
            .await
    }

    #[tracing::instrument(name = "cart_store.view_cart", skip(self), err)]
    async fn view_cart(&self, cart: CartUuid) -> Result<Option<CartView>, CartsServiceError> {
        self.db
            .within_deadline("view_cart", async {
                let mut tx = self.db.begin_transaction().await?;

                let Some(found) = self.carts_repository.find_cart(&mut tx, cart).await? else {
                    return Ok::<_, CartsServiceError>(None);
                };

                let items = self.items_repository.get_cart_lines(&mut tx, cart).await?;

                tx.commit().await?;

                Ok::<_, CartsServiceError>(Some(CartView { cart: found, items }))
            })
            .await
    }

    #[tracing::instrument(name = "cart_store.empty_cart", skip(self), err)]
    async fn empty_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError> {
        self.db
            .within_deadline("empty_cart", async {
                let mut tx = self.db.begin_transaction().await?;

                let removed = self
                    .items_repository
                    .delete_cart_items(&mut tx, cart)
                    .await?;

                self.carts_repository.touch_cart(&mut tx, cart).await?;

                tx.commit().await?;

                tracing::debug!(removed, "cart emptied");

                Ok::<_, CartsServiceError>(())
            })
            .await
    }
}

/// Transactional persistence for carts and their items.
#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Insert a new, empty cart.
    async fn create_cart(&self, cart: NewCart) -> Result<Cart, CartsServiceError>;

    /// Add `item` to the cart, merging quantities when the product is already present.
    async fn add_item(
        &self,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Lower the product's quantity by `by`, deleting the row once it would reach zero.
    ///
    /// Returns the remaining item, or `None` when the row was deleted or never existed.
    async fn decrease_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
        by: Quantity,
    ) -> Result<Option<CartItem>, CartsServiceError>;

    /// Delete the product's row. Succeeds when there is nothing to delete.
    async fn remove_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError>;

    /// Cart lines joined with product data, oldest first. Missing and empty carts both yield
    /// an empty list.
    async fn get_cart(&self, cart: CartUuid) -> Result<Vec<CartLine>, CartsServiceError>;

    /// The cart and its lines read in one transaction, or `None` if the cart does not exist.
    async fn view_cart(&self, cart: CartUuid) -> Result<Option<CartView>, CartsServiceError>;

    /// Delete every item and advance the cart's `updated_at`.
    async fn empty_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError>;
}
