use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::script;
use crate::state::AppState;

/// Routes mounted at `/scripts`.
///
/// ```text
/// GET    /{id}                      -> get_by_id
/// POST   /{id}/regenerate           -> regenerate
/// PUT    /{id}/content              -> deliver_content
/// PUT    /{id}/winner               -> set_winner
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(script::get_by_id))
        .route("/{id}/regenerate", post(script::regenerate))
        .route("/{id}/content", put(script::deliver_content))
        .route("/{id}/winner", put(script::set_winner))
}
