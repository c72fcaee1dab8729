//! Product entity model and DTOs.

use adforge_core::product_status::ProductStatus;
use adforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A product row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub notes: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProductStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new product. New products always start `inactive`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    pub project_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub notes: Option<String>,
}
