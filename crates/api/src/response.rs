//! Shared response envelope types for API handlers.
//!
//! All `/api/v1` responses use a `{ "data": ... }` envelope.

use adforge_core::product_status::{available_triggers, ProductTrigger};
use adforge_db::models::product::Product;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A product plus the generation steps a client may offer for it.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub available_triggers: &'static [ProductTrigger],
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            available_triggers: available_triggers(product.status),
            product,
        }
    }
}
