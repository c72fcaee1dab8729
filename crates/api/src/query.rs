//! Query parameter types for API handlers.

use adforge_core::selection::SelectionFilter;
use serde::Deserialize;

/// `?filter=all|selected|unselected` for angle listings.
#[derive(Debug, Default, Deserialize)]
pub struct AngleListParams {
    #[serde(default)]
    pub filter: SelectionFilter,
}

/// `?timeout_secs=` for the completion wait. Capped by configuration.
#[derive(Debug, Default, Deserialize)]
pub struct WaitParams {
    pub timeout_secs: Option<u64>,
}
