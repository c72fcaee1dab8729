//! Script version entity model and DTOs.

use adforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scripts` table.
///
/// `content` is `None` until the generator delivers the text for this version.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Script {
    pub id: DbId,
    pub angle_id: DbId,
    pub version: i32,
    pub duration_minutes: i32,
    pub content: Option<String>,
    pub feedback: Option<String>,
    pub is_winner: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Script {
    /// True while the generator has not delivered this version's text.
    pub fn is_pending(&self) -> bool {
        self.content.is_none()
    }
}

/// DTO for reserving the next version of an angle's script chain.
///
/// The insert only succeeds if `version` is exactly one above the angle's
/// current highest version.
#[derive(Debug, Clone, Deserialize)]
pub struct NewScriptVersion {
    pub angle_id: DbId,
    pub version: i32,
    pub duration_minutes: i32,
    pub feedback: Option<String>,
}
