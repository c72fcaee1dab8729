//! Storage traits used by the orchestration layer.
//!
//! Two implementations exist: [`crate::pg::PgStore`] on top of the
//! repositories, and [`crate::memory::MemoryStore`] for development and
//! tests. Both honour the same atomicity contract: status changes are
//! compare-and-swap, selection toggles are a single flip, and script
//! versions are only appended as `max + 1`.

use adforge_core::product_status::ProductStatus;
use adforge_core::types::DbId;
use async_trait::async_trait;

use crate::models::angle::{Angle, CreateAngle};
use crate::models::product::{CreateProduct, Product};
use crate::models::project::{CreateProject, Project};
use crate::models::script::{NewScriptVersion, Script};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying database call failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness rule rejected the write (constraint name).
    #[error("Duplicate value violates {0}")]
    Duplicate(String),

    /// The referenced parent row does not exist (constraint name).
    #[error("Missing parent row for {0}")]
    MissingParent(String),

    /// The store cannot currently serve requests.
    #[error("Store unavailable")]
    Unavailable,
}

impl StoreError {
    /// Classify a sqlx error, splitting out PostgreSQL constraint violations.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => return StoreError::Duplicate(constraint),
                // foreign_key_violation
                Some("23503") => return StoreError::MissingParent(constraint),
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, input: &CreateProject) -> Result<Project, StoreError>;
    async fn find_project(&self, id: DbId) -> Result<Option<Project>, StoreError>;
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create_product(&self, input: &CreateProduct) -> Result<Product, StoreError>;
    async fn find_product(&self, id: DbId) -> Result<Option<Product>, StoreError>;
    async fn list_products(&self, project_id: DbId) -> Result<Vec<Product>, StoreError>;

    /// Move product `id` from `expected` to `next` atomically.
    ///
    /// Returns `false` (and writes nothing) when the current status is not
    /// `expected` or the product does not exist.
    async fn compare_and_set_status(
        &self,
        id: DbId,
        expected: ProductStatus,
        next: ProductStatus,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AngleStore: Send + Sync {
    async fn create_angle(&self, input: &CreateAngle) -> Result<Angle, StoreError>;
    async fn find_angle(&self, id: DbId) -> Result<Option<Angle>, StoreError>;
    /// Angles of a product, most recently created first.
    async fn list_angles(&self, product_id: DbId) -> Result<Vec<Angle>, StoreError>;
    /// Flip `is_selected`; `None` if the angle does not exist.
    async fn toggle_selection(&self, id: DbId) -> Result<Option<Angle>, StoreError>;
}

#[async_trait]
pub trait ScriptStore: Send + Sync {
    /// Append `input.version` if it is exactly `max + 1` for the angle.
    ///
    /// `Ok(None)` means the chain has moved on; a racing insert of the same
    /// version may instead fail with [`StoreError::Duplicate`].
    async fn insert_next_version(
        &self,
        input: &NewScriptVersion,
    ) -> Result<Option<Script>, StoreError>;
    async fn find_script(&self, id: DbId) -> Result<Option<Script>, StoreError>;
    /// Versions of an angle ordered by version descending.
    async fn list_scripts(&self, angle_id: DbId) -> Result<Vec<Script>, StoreError>;
    async fn current_script(&self, angle_id: DbId) -> Result<Option<Script>, StoreError>;
    async fn delete_script(&self, id: DbId) -> Result<bool, StoreError>;
    /// Set content on a pending version; `None` if missing or already filled.
    async fn fill_script_content(
        &self,
        id: DbId,
        content: &str,
    ) -> Result<Option<Script>, StoreError>;
    /// Set the winner flag, clearing other winners of the angle when `true`.
    async fn set_winner(&self, id: DbId, is_winner: bool) -> Result<Option<Script>, StoreError>;
}

/// Everything the workflow needs from persistence.
#[async_trait]
pub trait Store: ProjectStore + ProductStore + AngleStore + ScriptStore {
    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
