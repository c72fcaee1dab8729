//! Route definitions for the `/products` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{angle, product};
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET    /{id}                      -> get_by_id
/// POST   /{id}/generate-details     -> generate_details
/// POST   /{id}/generate-angles      -> generate_angles
/// PUT    /{id}/status               -> report_status
/// GET    /{id}/status/wait          -> wait_for_status
/// GET    /{id}/angles       -> angle::list_by_product
/// POST   /{id}/angles       -> angle::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(product::get_by_id))
        .route("/{id}/generate-details", post(product::generate_details))
        .route("/{id}/generate-angles", post(product::generate_angles))
        .route("/{id}/status", put(product::report_status))
        .route("/{id}/status/wait", get(product::wait_for_status))
        .route(
            "/{id}/angles",
            get(angle::list_by_product).post(angle::create),
        )
}
