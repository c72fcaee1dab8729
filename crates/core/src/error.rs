use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A trigger was fired from a status that does not define it.
    #[error("Invalid transition: cannot {trigger} while status is '{from}'")]
    InvalidTransition { from: String, trigger: String },

    /// Another generation request for the same entity is still outstanding.
    #[error("Generation already in flight for {key}")]
    InFlight { key: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
