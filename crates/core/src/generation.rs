//! Outbound generation requests and their request-side validation.
//!
//! Every request to the external generation service is a single JSON
//! envelope `{ "action": ..., "data": { ... } }`. [`GenerationRequest`]
//! serializes to exactly that shape through serde's adjacent tagging.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::product_status::ProductTrigger;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Script parameters
// ---------------------------------------------------------------------------

/// Shortest script the generator accepts, in minutes.
pub const MIN_SCRIPT_DURATION_MINUTES: i32 = 1;
/// Longest script the generator accepts, in minutes.
pub const MAX_SCRIPT_DURATION_MINUTES: i32 = 60;
/// Duration used when a caller does not ask for one.
pub const DEFAULT_SCRIPT_DURATION_MINUTES: i32 = 2;
/// Maximum length of a feedback note driving a regeneration.
pub const MAX_FEEDBACK_LENGTH: usize = 5_000;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A request to the external generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum GenerationRequest {
    GenerateProjectDetails { product_id: DbId },
    GenerateAngles { product_id: DbId },
    GenerateScript { angle_id: DbId, duration_minutes: i32 },
    /// `script_id` is the version being revised; the generator delivers the
    /// revision into the pending version `new_script_id`.
    FeedbackIteration {
        script_id: DbId,
        new_script_id: DbId,
        feedback: String,
    },
}

impl GenerationRequest {
    /// Request matching a product-level trigger.
    pub fn for_product(trigger: ProductTrigger, product_id: DbId) -> Self {
        match trigger {
            ProductTrigger::GenerateDetails => {
                GenerationRequest::GenerateProjectDetails { product_id }
            }
            ProductTrigger::GenerateAngles => GenerationRequest::GenerateAngles { product_id },
        }
    }

    /// The `action` field of the envelope.
    pub fn action(&self) -> &'static str {
        match self {
            GenerationRequest::GenerateProjectDetails { .. } => "generateProjectDetails",
            GenerationRequest::GenerateAngles { .. } => "generateAngles",
            GenerationRequest::GenerateScript { .. } => "generateScript",
            GenerationRequest::FeedbackIteration { .. } => "feedbackIteration",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate a requested script duration.
pub fn validate_duration_minutes(minutes: i32) -> Result<(), CoreError> {
    if (MIN_SCRIPT_DURATION_MINUTES..=MAX_SCRIPT_DURATION_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "duration_minutes must be between {MIN_SCRIPT_DURATION_MINUTES} and \
             {MAX_SCRIPT_DURATION_MINUTES} (got {minutes})"
        )))
    }
}

/// Validate and normalize regeneration feedback.
///
/// Returns the trimmed text. Empty or whitespace-only feedback is rejected.
pub fn normalize_feedback(feedback: &str) -> Result<String, CoreError> {
    let trimmed = feedback.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Feedback must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_FEEDBACK_LENGTH {
        return Err(CoreError::Validation(format!(
            "Feedback exceeds maximum length of {MAX_FEEDBACK_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
