//! Repository for the `angles` table.

use adforge_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::angle::{Angle, CreateAngle};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, product_id, title, summary, video_idea, vsl_structure, \
    emotional_triggers, cognitive_biases, direct_response_techniques, is_selected, created_at";

/// Provides CRUD and selection operations for angles.
pub struct AngleRepo;

impl AngleRepo {
    /// Insert a new, unselected angle.
    pub async fn create(pool: &PgPool, input: &CreateAngle) -> Result<Angle, sqlx::Error> {
        let content = &input.content;
        let query = format!(
            "INSERT INTO angles
                (product_id, title, summary, video_idea, vsl_structure,
                 emotional_triggers, cognitive_biases, direct_response_techniques)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Angle>(&query)
            .bind(input.product_id)
            .bind(&content.title)
            .bind(&content.summary)
            .bind(&content.video_idea)
            .bind(Json(&content.vsl_structure))
            .bind(Json(&content.emotional_triggers))
            .bind(Json(&content.cognitive_biases))
            .bind(Json(&content.direct_response_techniques))
            .fetch_one(pool)
            .await
    }

    /// Find an angle by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Angle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM angles WHERE id = $1");
        sqlx::query_as::<_, Angle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the angles of a product, most recently created first.
    pub async fn list_by_product(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<Angle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM angles WHERE product_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Angle>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }

    /// Flip `is_selected` in a single statement.
    ///
    /// Returns `None` if no angle with the given `id` exists.
    pub async fn toggle_selection(pool: &PgPool, id: DbId) -> Result<Option<Angle>, sqlx::Error> {
        let query = format!(
            "UPDATE angles SET is_selected = NOT is_selected WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Angle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
