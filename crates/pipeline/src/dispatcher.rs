//! Optimistic product transitions around an external generation call.
//!
//! [`GenerationDispatcher::trigger`] runs the whole protocol for a product
//! step: single-flight claim, transition planning, compare-and-swap into the
//! `*_generating` status, the webhook call, and rollback when the call
//! fails. The in-flight registry is also shared with the script chain
//! through [`GenerationDispatcher::claim`].
//!
//! The webhook call and its compensation run on a spawned task that owns
//! the flight guard. Dropping the caller's future (request timeout, client
//! disconnect) therefore never leaves a product stuck in `*_generating` or a
//! reserved script version without a dispatch.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use adforge_core::error::CoreError;
use adforge_core::generation::GenerationRequest;
use adforge_core::product_status::{plan_transition, ProductStatus, ProductTrigger, Transition};
use adforge_core::types::DbId;
use adforge_db::Store;

use crate::error::PipelineError;
use crate::trigger::{GenerationTrigger, TriggerError};

// ---------------------------------------------------------------------------
// Single-flight registry
// ---------------------------------------------------------------------------

/// Entity a generation request is outstanding for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightKey {
    Product(DbId),
    Angle(DbId),
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightKey::Product(id) => write!(f, "product {id}"),
            FlightKey::Angle(id) => write!(f, "angle {id}"),
        }
    }
}

type Registry = Arc<Mutex<HashSet<FlightKey>>>;

fn lock(registry: &Registry) -> MutexGuard<'_, HashSet<FlightKey>> {
    // The set stays consistent even if a holder panicked mid-insert.
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds a [`FlightKey`] until dropped.
#[derive(Debug)]
#[must_use = "the key is released as soon as the guard is dropped"]
pub struct FlightGuard {
    registry: Registry,
    key: FlightKey,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        lock(&self.registry).remove(&self.key);
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Undo step applied when a dispatched request is not accepted.
#[derive(Debug, Clone, Copy)]
pub enum Compensation {
    /// Compare-and-swap the product back from `transition.to`.
    RollBackStatus {
        product_id: DbId,
        transition: Transition,
    },
    /// Delete a script version reserved for the request.
    ReleaseScript { script_id: DbId },
}

#[derive(Clone)]
pub struct GenerationDispatcher {
    store: Arc<dyn Store>,
    trigger: Arc<dyn GenerationTrigger>,
    in_flight: Registry,
}

impl GenerationDispatcher {
    pub fn new(store: Arc<dyn Store>, trigger: Arc<dyn GenerationTrigger>) -> Self {
        Self {
            store,
            trigger,
            in_flight: Arc::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Claim `key`, refusing if a request for it is already outstanding.
    pub fn claim(&self, key: FlightKey) -> Result<FlightGuard, CoreError> {
        if !lock(&self.in_flight).insert(key) {
            tracing::debug!(%key, "Refusing duplicate generation request");
            return Err(CoreError::InFlight {
                key: key.to_string(),
            });
        }
        Ok(FlightGuard {
            registry: Arc::clone(&self.in_flight),
            key,
        })
    }

    pub fn is_in_flight(&self, key: FlightKey) -> bool {
        lock(&self.in_flight).contains(&key)
    }

    /// Hand a request to the external service, with no state changes.
    pub async fn fire(&self, request: &GenerationRequest) -> Result<(), TriggerError> {
        tracing::debug!(action = request.action(), "Dispatching generation request");
        self.trigger.fire(request).await
    }

    /// Fire `request` on a detached task and apply `undo` if it fails.
    ///
    /// `guard` moves into the task, so the key stays claimed until the call
    /// and any compensation have finished, even if this future is dropped.
    pub async fn dispatch(
        &self,
        guard: FlightGuard,
        request: GenerationRequest,
        undo: Compensation,
    ) -> Result<(), PipelineError> {
        let this = self.clone();
        let task = tokio::spawn(async move {
            let _guard = guard;
            let result = this.fire(&request).await;
            if let Err(e) = &result {
                tracing::warn!(
                    action = request.action(),
                    error = %e,
                    "Generation dispatch failed",
                );
                this.compensate(undo).await;
            }
            result
        });

        match task.await {
            Ok(result) => result.map_err(PipelineError::Dispatch),
            Err(e) => {
                Err(CoreError::Internal(format!("Generation dispatch task failed: {e}")).into())
            }
        }
    }

    /// Run `trigger` for a product and return the status it was left in.
    ///
    /// On success the product stays in the optimistic `*_generating` status
    /// until the external service reports back. On dispatch failure the
    /// status is rolled back and [`PipelineError::Dispatch`] is returned.
    pub async fn trigger(
        &self,
        product_id: DbId,
        trigger: ProductTrigger,
    ) -> Result<ProductStatus, PipelineError> {
        let guard = self.claim(FlightKey::Product(product_id))?;

        let product = self
            .store
            .find_product(product_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Product",
                id: product_id,
            })?;
        let transition = plan_transition(product.status, trigger)?;

        let applied = self
            .store
            .compare_and_set_status(product_id, transition.from, transition.to)
            .await?;
        if !applied {
            return Err(CoreError::Conflict(format!(
                "Product {product_id} left status '{}' before {trigger} could start",
                transition.from
            ))
            .into());
        }
        tracing::info!(
            product_id,
            %trigger,
            from = %transition.from,
            to = %transition.to,
            "Product status advanced",
        );

        self.dispatch(
            guard,
            GenerationRequest::for_product(trigger, product_id),
            Compensation::RollBackStatus {
                product_id,
                transition,
            },
        )
        .await?;
        Ok(transition.to)
    }

    async fn compensate(&self, undo: Compensation) {
        match undo {
            Compensation::RollBackStatus {
                product_id,
                transition,
            } => self.roll_back(product_id, &transition).await,
            Compensation::ReleaseScript { script_id } => {
                if let Err(e) = self.store.delete_script(script_id).await {
                    tracing::error!(
                        script_id,
                        error = %e,
                        "Failed to release reserved script version",
                    );
                }
            }
        }
    }

    async fn roll_back(&self, product_id: DbId, transition: &Transition) {
        match self
            .store
            .compare_and_set_status(product_id, transition.to, transition.rollback)
            .await
        {
            Ok(true) => tracing::info!(
                product_id,
                status = %transition.rollback,
                "Product status rolled back",
            ),
            Ok(false) => tracing::warn!(
                product_id,
                expected = %transition.to,
                "Product status changed before rollback; leaving it",
            ),
            Err(e) => tracing::error!(
                product_id,
                status = %transition.rollback,
                error = %e,
                "Failed to roll back product status",
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
