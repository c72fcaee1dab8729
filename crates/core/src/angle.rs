//! Typed content of a marketing angle.
//!
//! Angles arrive from the external generator. Their content is validated
//! here, at the boundary, before it is persisted: every narrative field has
//! a defined shape instead of free-form JSON.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

/// Named part of a video sales letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VslSectionKind {
    Hook,
    Problem,
    Agitation,
    Solution,
    Proof,
    Offer,
    CallToAction,
}

/// One section of the VSL structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VslSection {
    pub kind: VslSectionKind,
    #[validate(length(min = 1, message = "section content must not be empty"))]
    pub content: String,
}

/// The full narrative content of an angle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AngleContent {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1))]
    pub summary: String,
    #[validate(length(min = 1))]
    pub video_idea: String,
    #[validate(length(min = 1, max = 7), nested)]
    pub vsl_structure: Vec<VslSection>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub emotional_triggers: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub cognitive_biases: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub direct_response_techniques: Vec<String>,
}

impl AngleContent {
    /// Run field rules plus the cross-field VSL checks.
    pub fn validate_content(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(format!("Invalid angle content: {e}")))?;
        validate_vsl_order(&self.vsl_structure)?;
        for (name, list) in [
            ("emotional_triggers", &self.emotional_triggers),
            ("cognitive_biases", &self.cognitive_biases),
            ("direct_response_techniques", &self.direct_response_techniques),
        ] {
            if list.iter().any(|item| item.trim().is_empty()) {
                return Err(CoreError::Validation(format!(
                    "{name} must not contain blank entries"
                )));
            }
        }
        Ok(())
    }
}

/// Each VSL section kind may appear at most once.
pub fn validate_vsl_order(sections: &[VslSection]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for section in sections {
        if !seen.insert(section.kind) {
            return Err(CoreError::Validation(format!(
                "VSL section {:?} appears more than once",
                section.kind
            )));
        }
    }
    Ok(())
}
