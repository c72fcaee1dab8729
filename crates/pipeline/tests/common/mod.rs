//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use adforge_core::angle::{AngleContent, VslSection, VslSectionKind};
use adforge_core::generation::GenerationRequest;
use adforge_core::product_status::{ProductStatus, ALL_STATUSES};
use adforge_core::types::DbId;
use adforge_db::models::angle::{Angle, CreateAngle};
use adforge_db::models::product::{CreateProduct, Product};
use adforge_db::models::project::CreateProject;
use adforge_db::store::{AngleStore, ProductStore, ProjectStore};
use adforge_db::MemoryStore;
use adforge_pipeline::{FlightKey, GenerationDispatcher, GenerationTrigger, TriggerError};
use async_trait::async_trait;
use tokio::sync::Notify;

/// Records every request; can fail or park calls on demand.
#[derive(Default)]
pub struct StubTrigger {
    requests: Mutex<Vec<GenerationRequest>>,
    failing: AtomicBool,
    holding: AtomicBool,
    /// Signalled when a held call has been entered.
    pub entered: Notify,
    /// Releases one held call.
    pub release: Notify,
}

impl StubTrigger {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_holding(&self, holding: bool) {
        self.holding.store(holding, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationTrigger for StubTrigger {
    async fn fire(&self, request: &GenerationRequest) -> Result<(), TriggerError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.holding.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            Err(TriggerError::HttpStatus(503))
        } else {
            Ok(())
        }
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub trigger: Arc<StubTrigger>,
    pub dispatcher: Arc<GenerationDispatcher>,
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let trigger = Arc::new(StubTrigger::default());
    let dispatcher = Arc::new(GenerationDispatcher::new(store.clone(), trigger.clone()));
    Harness {
        store,
        trigger,
        dispatcher,
    }
}

/// Wait for a detached dispatch to finish and drop its flight key.
pub async fn wait_until_idle(h: &Harness, key: FlightKey) {
    for _ in 0..200 {
        if !h.dispatcher.is_in_flight(key) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("{key} still in flight");
}

/// Create a project and product, then walk the product up to `status`.
pub async fn seed_product(store: &MemoryStore, status: ProductStatus) -> Product {
    let project = store
        .create_project(&CreateProject {
            name: "Spring launch".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let product = store
        .create_product(&CreateProduct {
            project_id: project.id,
            name: "Meal kit".to_string(),
            notes: Some("Family boxes".to_string()),
        })
        .await
        .unwrap();
    force_status(store, product.id, status).await;
    store.find_product(product.id).await.unwrap().unwrap()
}

/// Simulate the external service walking a product forward to `target`.
pub async fn force_status(store: &MemoryStore, product_id: DbId, target: ProductStatus) {
    for pair in ALL_STATUSES.windows(2) {
        let current = store.find_product(product_id).await.unwrap().unwrap().status;
        if current == target {
            return;
        }
        if current == pair[0] {
            assert!(store
                .compare_and_set_status(product_id, pair[0], pair[1])
                .await
                .unwrap());
        }
    }
}

pub fn angle_content(title: &str) -> AngleContent {
    AngleContent {
        title: title.to_string(),
        summary: "Busy parents want meals without planning".to_string(),
        video_idea: "Parent rushing through a weeknight".to_string(),
        vsl_structure: vec![
            VslSection {
                kind: VslSectionKind::Hook,
                content: "Dinner at 9pm again?".to_string(),
            },
            VslSection {
                kind: VslSectionKind::CallToAction,
                content: "Start your first box today".to_string(),
            },
        ],
        emotional_triggers: vec!["relief".to_string()],
        cognitive_biases: vec!["loss aversion".to_string()],
        direct_response_techniques: vec!["scarcity".to_string()],
    }
}

pub async fn seed_angle(store: &MemoryStore, product_id: DbId, title: &str) -> Angle {
    store
        .create_angle(&CreateAngle {
            product_id,
            content: angle_content(title),
        })
        .await
        .unwrap()
}

/// A selected angle under a product that has reached `angles_generated`.
pub async fn seed_selected_angle(store: &MemoryStore) -> Angle {
    let product = seed_product(store, ProductStatus::AnglesGenerated).await;
    let angle = seed_angle(store, product.id, "Time-poor parents").await;
    store.toggle_selection(angle.id).await.unwrap().unwrap()
}
