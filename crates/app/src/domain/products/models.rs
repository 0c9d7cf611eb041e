//! Product Models

use crate::uuids::TypedUuid;

/// Catalog product. Rows are owned by the catalog; carts only reference them by id.
#[derive(Debug)]
pub struct Product;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;
