//! Ordered, append-only script versions per angle.
//!
//! A version row is reserved (with no content) before its generation request
//! is fired, so callers get the version they asked for straight away. The
//! generator later delivers the text through [`ScriptVersionChain::complete`].
//! If the request cannot be dispatched, the reserved row is removed again.

use std::sync::Arc;

use adforge_core::error::CoreError;
use adforge_core::generation::{normalize_feedback, validate_duration_minutes, GenerationRequest};
use adforge_core::product_status::ProductStatus;
use adforge_core::types::DbId;
use adforge_db::models::script::{NewScriptVersion, Script};
use adforge_db::{Store, StoreError};

use crate::dispatcher::{Compensation, FlightKey, GenerationDispatcher};
use crate::error::PipelineError;

pub struct ScriptVersionChain {
    dispatcher: Arc<GenerationDispatcher>,
}

impl ScriptVersionChain {
    pub fn new(dispatcher: Arc<GenerationDispatcher>) -> Self {
        Self { dispatcher }
    }

    fn store(&self) -> &Arc<dyn Store> {
        self.dispatcher.store()
    }

    // ── Version creation ─────────────────────────────────────────────

    /// Create version 1 for a selected angle and request its generation.
    pub async fn generate_initial(
        &self,
        angle_id: DbId,
        duration_minutes: i32,
    ) -> Result<Script, PipelineError> {
        validate_duration_minutes(duration_minutes)?;
        let guard = self.dispatcher.claim(FlightKey::Angle(angle_id))?;
        self.ensure_scriptable(angle_id).await?;

        if self.store().current_script(angle_id).await?.is_some() {
            return Err(CoreError::Conflict(format!(
                "Angle {angle_id} already has a script; regenerate it instead"
            ))
            .into());
        }

        let reserved = self
            .reserve(NewScriptVersion {
                angle_id,
                version: 1,
                duration_minutes,
                feedback: None,
            })
            .await?;
        self.dispatcher
            .dispatch(
                guard,
                GenerationRequest::GenerateScript {
                    angle_id,
                    duration_minutes,
                },
                Compensation::ReleaseScript {
                    script_id: reserved.id,
                },
            )
            .await?;

        tracing::info!(angle_id, script_id = reserved.id, "Initial script requested");
        Ok(reserved)
    }

    /// Append a new version driven by `feedback` on the script `script_id`.
    ///
    /// The new version always follows the angle's current version, whichever
    /// version `script_id` names. Earlier versions are left untouched. The
    /// request names the script being revised and the pending version the
    /// generator should deliver into.
    pub async fn regenerate(
        &self,
        script_id: DbId,
        feedback: &str,
    ) -> Result<Script, PipelineError> {
        let feedback = normalize_feedback(feedback)?;

        let script = self
            .store()
            .find_script(script_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Script",
                id: script_id,
            })?;
        let angle_id = script.angle_id;
        let guard = self.dispatcher.claim(FlightKey::Angle(angle_id))?;
        self.ensure_scriptable(angle_id).await?;

        let current = self
            .store()
            .current_script(angle_id)
            .await?
            .unwrap_or(script);

        let reserved = self
            .reserve(NewScriptVersion {
                angle_id,
                version: current.version + 1,
                duration_minutes: current.duration_minutes,
                feedback: Some(feedback.clone()),
            })
            .await?;
        self.dispatcher
            .dispatch(
                guard,
                GenerationRequest::FeedbackIteration {
                    script_id,
                    new_script_id: reserved.id,
                    feedback,
                },
                Compensation::ReleaseScript {
                    script_id: reserved.id,
                },
            )
            .await?;

        tracing::info!(
            angle_id,
            script_id = reserved.id,
            version = reserved.version,
            "Script regeneration requested",
        );
        Ok(reserved)
    }

    /// An angle yields scripts only while selected and once its product has
    /// reached `angles_generated`.
    async fn ensure_scriptable(&self, angle_id: DbId) -> Result<(), PipelineError> {
        let angle = self
            .store()
            .find_angle(angle_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Angle",
                id: angle_id,
            })?;
        if !angle.is_selected {
            return Err(CoreError::Validation(format!(
                "Angle {angle_id} must be selected before a script can be generated"
            ))
            .into());
        }

        let product = self
            .store()
            .find_product(angle.product_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Product",
                id: angle.product_id,
            })?;
        if product.status != ProductStatus::AnglesGenerated {
            return Err(CoreError::Validation(format!(
                "Product {} has status '{}'; scripts need '{}'",
                product.id,
                product.status,
                ProductStatus::AnglesGenerated
            ))
            .into());
        }
        Ok(())
    }

    async fn reserve(&self, input: NewScriptVersion) -> Result<Script, PipelineError> {
        match self.store().insert_next_version(&input).await {
            Ok(Some(script)) => Ok(script),
            Ok(None) | Err(StoreError::Duplicate(_)) => Err(CoreError::Conflict(format!(
                "Version {} of angle {} is no longer the next version",
                input.version, input.angle_id
            ))
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// All versions of an angle, newest first. Empty if the store fails.
    pub async fn list_versions(&self, angle_id: DbId) -> Vec<Script> {
        match self.store().list_scripts(angle_id).await {
            Ok(versions) => versions,
            Err(e) => {
                tracing::error!(angle_id, error = %e, "Failed to list script versions");
                Vec::new()
            }
        }
    }

    pub async fn current(&self, angle_id: DbId) -> Result<Option<Script>, PipelineError> {
        Ok(self.store().current_script(angle_id).await?)
    }

    // ── Updates ──────────────────────────────────────────────────────

    /// Store the generator's text for a pending version.
    pub async fn complete(&self, script_id: DbId, content: &str) -> Result<Script, PipelineError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(
                CoreError::Validation("Script content must not be empty".to_string()).into(),
            );
        }

        if let Some(script) = self.store().fill_script_content(script_id, content).await? {
            tracing::info!(script_id, version = script.version, "Script content delivered");
            return Ok(script);
        }

        match self.store().find_script(script_id).await? {
            Some(_) => Err(CoreError::Conflict(format!(
                "Script {script_id} already has content"
            ))
            .into()),
            None => Err(CoreError::NotFound {
                entity: "Script",
                id: script_id,
            }
            .into()),
        }
    }

    /// Flag or unflag a version as the angle's winner.
    pub async fn set_winner(
        &self,
        script_id: DbId,
        is_winner: bool,
    ) -> Result<Script, PipelineError> {
        let script = self
            .store()
            .set_winner(script_id, is_winner)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Script",
                id: script_id,
            })?;
        tracing::info!(script_id, is_winner, "Script winner flag updated");
        Ok(script)
    }
}
