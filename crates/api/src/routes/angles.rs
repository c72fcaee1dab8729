use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{angle, script};
use crate::state::AppState;

/// Routes mounted at `/angles`.
///
/// ```text
/// GET    /{id}                      -> get_by_id
/// POST   /{id}/toggle-selection     -> toggle_selection
/// GET    /{id}/scripts        -> script::list_by_angle
/// POST   /{id}/scripts        -> script::generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(angle::get_by_id))
        .route("/{id}/toggle-selection", post(angle::toggle_selection))
        .route(
            "/{id}/scripts",
            get(script::list_by_angle).post(script::generate),
        )
}
