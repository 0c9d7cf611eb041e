//! Cart Models

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{carts::errors::ValidationError, products::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// A strictly positive item quantity.
///
/// Storage keeps quantities as 32-bit integers, so the upper bound is `i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(i32);

impl Quantity {
    /// Validate a caller supplied quantity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveQuantity`] for zero or negative values and
    /// [`ValidationError::QuantityTooLarge`] for values that do not fit in storage.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::NonPositiveQuantity(value));
        }

        i32::try_from(value)
            .map(Self)
            .map_err(|_overflow| ValidationError::QuantityTooLarge(value))
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    pub(crate) fn from_stored(value: i32) -> Result<Self, ValidationError> {
        Self::new(i64::from(value))
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        i64::from(value.0)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Cart lifecycle state. Every cart starts `Active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CartStatus {
    #[default]
    Active,
    CheckedOut,
    Abandoned,
}

impl CartStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::CheckedOut => "checked_out",
            Self::Abandoned => "abandoned",
        }
    }
}

impl Display for CartStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cart status `{0}`")]
pub struct UnknownCartStatus(String);

impl FromStr for CartStatus {
    type Err = UnknownCartStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "checked_out" => Ok(Self::CheckedOut),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(UnknownCartStatus(other.to_string())),
        }
    }
}

/// Cart Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub status: CartStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub quantity: Quantity,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart item joined with its product's name and price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item_uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: Quantity,
    pub product_name: String,
    pub price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartLine {
    /// Line total in minor currency units, saturating on overflow.
    #[must_use]
    pub fn total(&self) -> u64 {
        let quantity = u64::try_from(self.quantity.get()).unwrap_or_default();

        self.price.saturating_mul(quantity)
    }
}

/// A cart together with its materialized lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub cart: Cart,
    pub items: Vec<CartLine>,
}

impl CartView {
    /// Sum of every line total.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .map(CartLine::total)
            .fold(0, u64::saturating_add)
    }
}
