//! In-process [`Store`] used for local development and tests.
//!
//! All tables live behind one mutex, so every operation is trivially
//! atomic. [`MemoryStore::set_unavailable`] makes every call fail with
//! [`StoreError::Unavailable`], which lets callers exercise their
//! store-outage paths without a database.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use adforge_core::product_status::ProductStatus;
use adforge_core::types::DbId;
use async_trait::async_trait;
use chrono::Utc;

use crate::models::angle::{Angle, CreateAngle};
use crate::models::product::{CreateProduct, Product};
use crate::models::project::{CreateProject, Project};
use crate::models::script::{NewScriptVersion, Script};
use crate::store::{AngleStore, ProductStore, ProjectStore, ScriptStore, Store, StoreError};

#[derive(Default)]
struct Tables {
    last_id: DbId,
    projects: BTreeMap<DbId, Project>,
    products: BTreeMap<DbId, Product>,
    angles: BTreeMap<DbId, Angle>,
    scripts: BTreeMap<DbId, Script>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }
}

/// Mutex-guarded maps keyed by id. Ids are shared across tables and
/// strictly increasing, so "newest first" is "highest id first".
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while set, every operation fails.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        self.tables.lock().map_err(|_| StoreError::Unavailable)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create_project(&self, input: &CreateProject) -> Result<Project, StoreError> {
        let mut t = self.tables()?;
        let now = Utc::now();
        let project = Project {
            id: t.next_id(),
            name: input.name.clone(),
            description: input.description.clone(),
            created_at: now,
            updated_at: now,
        };
        t.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, StoreError> {
        Ok(self.tables()?.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.tables()?.projects.values().rev().cloned().collect())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn create_product(&self, input: &CreateProduct) -> Result<Product, StoreError> {
        let mut t = self.tables()?;
        if !t.projects.contains_key(&input.project_id) {
            return Err(StoreError::MissingParent("products_project_id_fkey".to_string()));
        }
        let now = Utc::now();
        let product = Product {
            id: t.next_id(),
            project_id: input.project_id,
            name: input.name.clone(),
            notes: input.notes.clone(),
            status: ProductStatus::Inactive,
            created_at: now,
            updated_at: now,
        };
        t.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_product(&self, id: DbId) -> Result<Option<Product>, StoreError> {
        Ok(self.tables()?.products.get(&id).cloned())
    }

    async fn list_products(&self, project_id: DbId) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .tables()?
            .products
            .values()
            .rev()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn compare_and_set_status(
        &self,
        id: DbId,
        expected: ProductStatus,
        next: ProductStatus,
    ) -> Result<bool, StoreError> {
        let mut t = self.tables()?;
        match t.products.get_mut(&id) {
            Some(product) if product.status == expected => {
                product.status = next;
                product.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl AngleStore for MemoryStore {
    async fn create_angle(&self, input: &CreateAngle) -> Result<Angle, StoreError> {
        let mut t = self.tables()?;
        if !t.products.contains_key(&input.product_id) {
            return Err(StoreError::MissingParent("angles_product_id_fkey".to_string()));
        }
        let content = input.content.clone();
        let angle = Angle {
            id: t.next_id(),
            product_id: input.product_id,
            title: content.title,
            summary: content.summary,
            video_idea: content.video_idea,
            vsl_structure: content.vsl_structure,
            emotional_triggers: content.emotional_triggers,
            cognitive_biases: content.cognitive_biases,
            direct_response_techniques: content.direct_response_techniques,
            is_selected: false,
            created_at: Utc::now(),
        };
        t.angles.insert(angle.id, angle.clone());
        Ok(angle)
    }

    async fn find_angle(&self, id: DbId) -> Result<Option<Angle>, StoreError> {
        Ok(self.tables()?.angles.get(&id).cloned())
    }

    async fn list_angles(&self, product_id: DbId) -> Result<Vec<Angle>, StoreError> {
        Ok(self
            .tables()?
            .angles
            .values()
            .rev()
            .filter(|a| a.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn toggle_selection(&self, id: DbId) -> Result<Option<Angle>, StoreError> {
        let mut t = self.tables()?;
        Ok(t.angles.get_mut(&id).map(|angle| {
            angle.is_selected = !angle.is_selected;
            angle.clone()
        }))
    }
}

#[async_trait]
impl ScriptStore for MemoryStore {
    async fn insert_next_version(
        &self,
        input: &NewScriptVersion,
    ) -> Result<Option<Script>, StoreError> {
        let mut t = self.tables()?;
        if !t.angles.contains_key(&input.angle_id) {
            return Err(StoreError::MissingParent("scripts_angle_id_fkey".to_string()));
        }
        let max = t
            .scripts
            .values()
            .filter(|s| s.angle_id == input.angle_id)
            .map(|s| s.version)
            .max()
            .unwrap_or(0);
        if input.version != max + 1 {
            return Ok(None);
        }
        let now = Utc::now();
        let script = Script {
            id: t.next_id(),
            angle_id: input.angle_id,
            version: input.version,
            duration_minutes: input.duration_minutes,
            content: None,
            feedback: input.feedback.clone(),
            is_winner: false,
            created_at: now,
            updated_at: now,
        };
        t.scripts.insert(script.id, script.clone());
        Ok(Some(script))
    }

    async fn find_script(&self, id: DbId) -> Result<Option<Script>, StoreError> {
        Ok(self.tables()?.scripts.get(&id).cloned())
    }

    async fn list_scripts(&self, angle_id: DbId) -> Result<Vec<Script>, StoreError> {
        let t = self.tables()?;
        let mut versions: Vec<Script> = t
            .scripts
            .values()
            .filter(|s| s.angle_id == angle_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    async fn current_script(&self, angle_id: DbId) -> Result<Option<Script>, StoreError> {
        Ok(self
            .tables()?
            .scripts
            .values()
            .filter(|s| s.angle_id == angle_id)
            .max_by_key(|s| s.version)
            .cloned())
    }

    async fn delete_script(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.tables()?.scripts.remove(&id).is_some())
    }

    async fn fill_script_content(
        &self,
        id: DbId,
        content: &str,
    ) -> Result<Option<Script>, StoreError> {
        let mut t = self.tables()?;
        Ok(match t.scripts.get_mut(&id) {
            Some(script) if script.content.is_none() => {
                script.content = Some(content.to_string());
                script.updated_at = Utc::now();
                Some(script.clone())
            }
            _ => None,
        })
    }

    async fn set_winner(&self, id: DbId, is_winner: bool) -> Result<Option<Script>, StoreError> {
        let mut t = self.tables()?;
        let Some(angle_id) = t.scripts.get(&id).map(|s| s.angle_id) else {
            return Ok(None);
        };
        let now = Utc::now();
        for script in t.scripts.values_mut() {
            if script.id == id {
                script.is_winner = is_winner;
                script.updated_at = now;
            } else if is_winner && script.angle_id == angle_id && script.is_winner {
                script.is_winner = false;
                script.updated_at = now;
            }
        }
        Ok(t.scripts.get(&id).cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.tables().map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
