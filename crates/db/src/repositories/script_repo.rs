//! Repository for the `scripts` table.

use adforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::script::{NewScriptVersion, Script};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, angle_id, version, duration_minutes, content, feedback, \
    is_winner, created_at, updated_at";

/// Provides version-chain operations for scripts.
pub struct ScriptRepo;

impl ScriptRepo {
    // ── Version chain ────────────────────────────────────────────────

    /// Insert `input.version` only if it directly follows the angle's
    /// current highest version (or is 1 for an empty chain).
    ///
    /// Returns `None` if the chain has moved on. A concurrent insert of the
    /// same version surfaces as a `uq_scripts_angle_version` violation.
    pub async fn insert_next_version(
        pool: &PgPool,
        input: &NewScriptVersion,
    ) -> Result<Option<Script>, sqlx::Error> {
        let query = format!(
            "INSERT INTO scripts (angle_id, version, duration_minutes, feedback)
             SELECT $1, $2, $3, $4
             WHERE (SELECT COALESCE(MAX(version), 0) FROM scripts WHERE angle_id = $1) = $2 - 1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(input.angle_id)
            .bind(input.version)
            .bind(input.duration_minutes)
            .bind(&input.feedback)
            .fetch_optional(pool)
            .await
    }

    /// Find a script version by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Script>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scripts WHERE id = $1");
        sqlx::query_as::<_, Script>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all versions for an angle, ordered by version descending.
    pub async fn list_by_angle(pool: &PgPool, angle_id: DbId) -> Result<Vec<Script>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scripts WHERE angle_id = $1 ORDER BY version DESC"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(angle_id)
            .fetch_all(pool)
            .await
    }

    /// The highest version for an angle (if any).
    pub async fn find_current(
        pool: &PgPool,
        angle_id: DbId,
    ) -> Result<Option<Script>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scripts WHERE angle_id = $1 ORDER BY version DESC LIMIT 1"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(angle_id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a version. Only used to undo a reservation whose
    /// generation request could not be dispatched.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scripts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Generated content ────────────────────────────────────────────

    /// Store generated text on a pending version.
    ///
    /// Returns `None` if the version does not exist or already has content.
    pub async fn fill_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Script>, sqlx::Error> {
        let query = format!(
            "UPDATE scripts SET content = $2 WHERE id = $1 AND content IS NULL RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    // ── Winner flag ──────────────────────────────────────────────────

    /// Set or clear the winner flag. Marking a winner un-marks any other
    /// winner of the same angle in the same transaction.
    ///
    /// Returns `None` if no version with the given `id` exists.
    pub async fn set_winner(
        pool: &PgPool,
        id: DbId,
        is_winner: bool,
    ) -> Result<Option<Script>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if is_winner {
            sqlx::query(
                "UPDATE scripts SET is_winner = false \
                 WHERE angle_id = (SELECT angle_id FROM scripts WHERE id = $1) \
                   AND id <> $1 AND is_winner = true",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!("UPDATE scripts SET is_winner = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let result = sqlx::query_as::<_, Script>(&query)
            .bind(id)
            .bind(is_winner)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result)
    }
}
