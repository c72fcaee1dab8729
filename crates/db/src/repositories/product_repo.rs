//! Repository for the `products` table.

use adforge_core::product_status::ProductStatus;
use adforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{CreateProduct, Product};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, notes, status, created_at, updated_at";

/// Provides CRUD and status operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product. The status column defaults to `inactive`.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (project_id, name, notes) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the products of a project, most recently created first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products WHERE project_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Atomically move a product from `expected` to `next`.
    ///
    /// Returns `false` if the product does not exist or its status is no
    /// longer `expected`.
    pub async fn compare_and_set_status(
        pool: &PgPool,
        id: DbId,
        expected: ProductStatus,
        next: ProductStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE products SET status = $3 WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(expected.as_str())
            .bind(next.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
