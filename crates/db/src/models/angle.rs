//! Angle entity model and DTOs.

use adforge_core::angle::{AngleContent, VslSection};
use adforge_core::selection::Selectable;
use adforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An angle row from the `angles` table. List columns are JSONB.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Angle {
    pub id: DbId,
    pub product_id: DbId,
    pub title: String,
    pub summary: String,
    pub video_idea: String,
    #[sqlx(json)]
    pub vsl_structure: Vec<VslSection>,
    #[sqlx(json)]
    pub emotional_triggers: Vec<String>,
    #[sqlx(json)]
    pub cognitive_biases: Vec<String>,
    #[sqlx(json)]
    pub direct_response_techniques: Vec<String>,
    pub is_selected: bool,
    pub created_at: Timestamp,
}

impl Selectable for Angle {
    fn is_selected(&self) -> bool {
        self.is_selected
    }
}

/// DTO for inserting an angle produced by the generator.
///
/// `content` must already have passed [`AngleContent::validate_content`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAngle {
    pub product_id: DbId,
    pub content: AngleContent,
}
