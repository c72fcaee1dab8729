//! Domain types and rules for the adforge generation workflow.
//!
//! Pure, storage-agnostic logic: the product status state machine, the
//! outbound generation envelope, typed angle content, and selection filters.

pub mod angle;
pub mod error;
pub mod generation;
pub mod product_status;
pub mod selection;
pub mod types;
