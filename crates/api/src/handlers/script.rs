//! Handlers for script versions.

use adforge_core::error::CoreError;
use adforge_core::generation::DEFAULT_SCRIPT_DURATION_MINUTES;
use adforge_core::types::DbId;
use adforge_db::models::script::Script;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::handlers::ensure_listing_parent;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateScriptRequest {
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct RegenerateRequest {
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct DeliverContentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SetWinnerRequest {
    pub is_winner: bool,
}

/// GET /api/v1/angles/{id}/scripts
pub async fn list_by_angle(
    State(state): State<AppState>,
    Path(angle_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Script>>>> {
    ensure_listing_parent("Angle", angle_id, state.store.find_angle(angle_id).await)?;
    let versions = state.scripts.list_versions(angle_id).await;
    Ok(Json(DataResponse { data: versions }))
}

/// POST /api/v1/angles/{id}/scripts
pub async fn generate(
    State(state): State<AppState>,
    Path(angle_id): Path<DbId>,
    ApiJson(input): ApiJson<GenerateScriptRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Script>>)> {
    let duration = input
        .duration_minutes
        .unwrap_or(DEFAULT_SCRIPT_DURATION_MINUTES);
    let script = state.scripts.generate_initial(angle_id, duration).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: script })))
}

/// GET /api/v1/scripts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Script>>> {
    let script = state
        .store
        .find_script(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Script",
            id,
        }))?;
    Ok(Json(DataResponse { data: script }))
}

/// POST /api/v1/scripts/{id}/regenerate
pub async fn regenerate(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ApiJson(input): ApiJson<RegenerateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Script>>)> {
    let script = state.scripts.regenerate(id, &input.feedback).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: script })))
}

/// PUT /api/v1/scripts/{id}/content
pub async fn deliver_content(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ApiJson(input): ApiJson<DeliverContentRequest>,
) -> AppResult<Json<DataResponse<Script>>> {
    let script = state.scripts.complete(id, &input.content).await?;
    Ok(Json(DataResponse { data: script }))
}

/// PUT /api/v1/scripts/{id}/winner
pub async fn set_winner(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ApiJson(input): ApiJson<SetWinnerRequest>,
) -> AppResult<Json<DataResponse<Script>>> {
    let script = state.scripts.set_winner(id, input.is_winner).await?;
    Ok(Json(DataResponse { data: script }))
}
