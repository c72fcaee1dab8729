pub mod angles;
pub mod health;
pub mod products;
pub mod projects;
pub mod scripts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects                               list, create
/// /projects/{id}                          get
/// /projects/{id}/products                 list, create
///
/// /products/{id}                          get
/// /products/{id}/generate-details         trigger details generation (POST)
/// /products/{id}/generate-angles          trigger angle generation (POST)
/// /products/{id}/status                   external status report (PUT)
/// /products/{id}/status/wait              wait for generation to settle (GET)
/// /products/{id}/angles                   list (?filter=), create
///
/// /angles/{id}                            get
/// /angles/{id}/toggle-selection           toggle selection (POST)
/// /angles/{id}/scripts                    list versions, generate version 1
///
/// /scripts/{id}                           get
/// /scripts/{id}/regenerate                feedback iteration (POST)
/// /scripts/{id}/content                   deliver generated text (PUT)
/// /scripts/{id}/winner                    set winner flag (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", projects::router())
        .nest("/products", products::router())
        .nest("/angles", angles::router())
        .nest("/scripts", scripts::router())
}
