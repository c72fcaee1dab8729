use adforge_core::error::CoreError;
use adforge_db::StoreError;

use crate::trigger::TriggerError;

/// Error type for workflow operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The generation request could not be handed to the external service.
    /// Any optimistic write has already been undone.
    #[error("Generation dispatch failed: {0}")]
    Dispatch(#[from] TriggerError),
}
