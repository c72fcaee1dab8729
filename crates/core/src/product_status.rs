//! Product generation lifecycle and its transition rules.
//!
//! A product moves linearly through
//! `inactive -> details_generating -> details_generated -> angles_generating -> angles_generated`.
//! The two user-facing triggers each perform an optimistic move into a
//! `*_generating` status and name the status to roll back to if the
//! external generation service cannot be reached. Completion is reported by
//! the external system, see [`validate_external_report`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a product's content-generation pipeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Inactive,
    DetailsGenerating,
    DetailsGenerated,
    AnglesGenerating,
    AnglesGenerated,
}

/// All statuses in lifecycle order.
pub const ALL_STATUSES: [ProductStatus; 5] = [
    ProductStatus::Inactive,
    ProductStatus::DetailsGenerating,
    ProductStatus::DetailsGenerated,
    ProductStatus::AnglesGenerating,
    ProductStatus::AnglesGenerated,
];

impl ProductStatus {
    /// Column / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Inactive => "inactive",
            ProductStatus::DetailsGenerating => "details_generating",
            ProductStatus::DetailsGenerated => "details_generated",
            ProductStatus::AnglesGenerating => "angles_generating",
            ProductStatus::AnglesGenerated => "angles_generated",
        }
    }

    /// True while an external generation step is outstanding.
    pub fn is_generating(self) -> bool {
        matches!(
            self,
            ProductStatus::DetailsGenerating | ProductStatus::AnglesGenerating
        )
    }

    /// `angles_generated` is the last status this machine knows about.
    pub fn is_terminal(self) -> bool {
        self == ProductStatus::AnglesGenerated
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STATUSES
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid product status '{s}'. Must be one of: {}",
                    ALL_STATUSES.map(ProductStatus::as_str).join(", ")
                ))
            })
    }
}

impl TryFrom<String> for ProductStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Triggers and transitions
// ---------------------------------------------------------------------------

/// User-initiated generation steps for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductTrigger {
    GenerateDetails,
    GenerateAngles,
}

impl ProductTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductTrigger::GenerateDetails => "generateDetails",
            ProductTrigger::GenerateAngles => "generateAngles",
        }
    }
}

impl fmt::Display for ProductTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A planned optimistic transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status the product must currently hold.
    pub from: ProductStatus,
    /// Status written before the external call.
    pub to: ProductStatus,
    /// Status restored if the external call fails.
    pub rollback: ProductStatus,
}

/// Plan the transition for `trigger` fired while the product is `current`.
///
/// | From                | Trigger         | Target               | Rollback            |
/// |---------------------|-----------------|----------------------|---------------------|
/// | `inactive`          | generateDetails | `details_generating` | `inactive`          |
/// | `details_generated` | generateAngles  | `angles_generating`  | `details_generated` |
///
/// Every other combination is rejected with [`CoreError::InvalidTransition`].
pub fn plan_transition(
    current: ProductStatus,
    trigger: ProductTrigger,
) -> Result<Transition, CoreError> {
    match (current, trigger) {
        (ProductStatus::Inactive, ProductTrigger::GenerateDetails) => Ok(Transition {
            from: current,
            to: ProductStatus::DetailsGenerating,
            rollback: ProductStatus::Inactive,
        }),
        (ProductStatus::DetailsGenerated, ProductTrigger::GenerateAngles) => Ok(Transition {
            from: current,
            to: ProductStatus::AnglesGenerating,
            rollback: ProductStatus::DetailsGenerated,
        }),
        _ => Err(CoreError::InvalidTransition {
            from: current.as_str().to_string(),
            trigger: trigger.as_str().to_string(),
        }),
    }
}

/// Triggers that may be offered for a product in `status`.
pub fn available_triggers(status: ProductStatus) -> &'static [ProductTrigger] {
    match status {
        ProductStatus::Inactive => &[ProductTrigger::GenerateDetails],
        ProductStatus::DetailsGenerated => &[ProductTrigger::GenerateAngles],
        _ => &[],
    }
}

/// Validate a status change reported by the external generation service.
///
/// The service may complete a step (`*_generating -> *_generated`) or report
/// that it gave up, which returns the product to the step's rollback status.
pub fn validate_external_report(
    current: ProductStatus,
    reported: ProductStatus,
) -> Result<(), CoreError> {
    use ProductStatus::*;

    let allowed = matches!(
        (current, reported),
        (DetailsGenerating, DetailsGenerated)
            | (DetailsGenerating, Inactive)
            | (AnglesGenerating, AnglesGenerated)
            | (AnglesGenerating, DetailsGenerated)
    );
    if allowed {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            from: current.as_str().to_string(),
            trigger: format!("report '{reported}'"),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
