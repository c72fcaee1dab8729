//! Angle selection for downstream script generation.

use std::sync::Arc;

use adforge_core::error::CoreError;
use adforge_core::selection::{apply_filter, count_selected, SelectionFilter};
use adforge_core::types::DbId;
use adforge_db::models::angle::Angle;
use adforge_db::Store;

use crate::error::PipelineError;

pub struct SelectionSet {
    store: Arc<dyn Store>,
}

impl SelectionSet {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Flip the selection flag of an angle in a single store write.
    pub async fn toggle(&self, angle_id: DbId) -> Result<Angle, PipelineError> {
        let angle = self
            .store
            .toggle_selection(angle_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Angle",
                id: angle_id,
            })?;
        tracing::debug!(angle_id, is_selected = angle.is_selected, "Angle selection toggled");
        Ok(angle)
    }

    /// Angles of a product matching `filter`, newest first.
    ///
    /// A store failure is logged and yields an empty list.
    pub async fn list(&self, product_id: DbId, filter: SelectionFilter) -> Vec<Angle> {
        match self.store.list_angles(product_id).await {
            Ok(angles) => apply_filter(angles, filter),
            Err(e) => {
                tracing::error!(product_id, %filter, error = %e, "Failed to list angles");
                Vec::new()
            }
        }
    }

    pub async fn selected_count(&self, product_id: DbId) -> usize {
        count_selected(&self.list(product_id, SelectionFilter::All).await)
    }
}
