//! [`Store`] implementation backed by PostgreSQL.

use adforge_core::product_status::ProductStatus;
use adforge_core::types::DbId;
use async_trait::async_trait;

use crate::models::angle::{Angle, CreateAngle};
use crate::models::product::{CreateProduct, Product};
use crate::models::project::{CreateProject, Project};
use crate::models::script::{NewScriptVersion, Script};
use crate::repositories::{AngleRepo, ProductRepo, ProjectRepo, ScriptRepo};
use crate::store::{AngleStore, ProductStore, ProjectStore, ScriptStore, Store, StoreError};
use crate::DbPool;

/// Delegates every store operation to the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn create_project(&self, input: &CreateProject) -> Result<Project, StoreError> {
        ProjectRepo::create(&self.pool, input)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, StoreError> {
        Ok(ProjectRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(ProjectRepo::list(&self.pool).await?)
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn create_product(&self, input: &CreateProduct) -> Result<Product, StoreError> {
        ProductRepo::create(&self.pool, input)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_product(&self, id: DbId) -> Result<Option<Product>, StoreError> {
        Ok(ProductRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_products(&self, project_id: DbId) -> Result<Vec<Product>, StoreError> {
        Ok(ProductRepo::list_by_project(&self.pool, project_id).await?)
    }

    async fn compare_and_set_status(
        &self,
        id: DbId,
        expected: ProductStatus,
        next: ProductStatus,
    ) -> Result<bool, StoreError> {
        Ok(ProductRepo::compare_and_set_status(&self.pool, id, expected, next).await?)
    }
}

#[async_trait]
impl AngleStore for PgStore {
    async fn create_angle(&self, input: &CreateAngle) -> Result<Angle, StoreError> {
        AngleRepo::create(&self.pool, input)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_angle(&self, id: DbId) -> Result<Option<Angle>, StoreError> {
        Ok(AngleRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_angles(&self, product_id: DbId) -> Result<Vec<Angle>, StoreError> {
        Ok(AngleRepo::list_by_product(&self.pool, product_id).await?)
    }

    async fn toggle_selection(&self, id: DbId) -> Result<Option<Angle>, StoreError> {
        Ok(AngleRepo::toggle_selection(&self.pool, id).await?)
    }
}

#[async_trait]
impl ScriptStore for PgStore {
    async fn insert_next_version(
        &self,
        input: &NewScriptVersion,
    ) -> Result<Option<Script>, StoreError> {
        ScriptRepo::insert_next_version(&self.pool, input)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_script(&self, id: DbId) -> Result<Option<Script>, StoreError> {
        Ok(ScriptRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_scripts(&self, angle_id: DbId) -> Result<Vec<Script>, StoreError> {
        Ok(ScriptRepo::list_by_angle(&self.pool, angle_id).await?)
    }

    async fn current_script(&self, angle_id: DbId) -> Result<Option<Script>, StoreError> {
        Ok(ScriptRepo::find_current(&self.pool, angle_id).await?)
    }

    async fn delete_script(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(ScriptRepo::hard_delete(&self.pool, id).await?)
    }

    async fn fill_script_content(
        &self,
        id: DbId,
        content: &str,
    ) -> Result<Option<Script>, StoreError> {
        Ok(ScriptRepo::fill_content(&self.pool, id, content).await?)
    }

    async fn set_winner(&self, id: DbId, is_winner: bool) -> Result<Option<Script>, StoreError> {
        ScriptRepo::set_winner(&self.pool, id, is_winner)
            .await
            .map_err(StoreError::from_sqlx)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
