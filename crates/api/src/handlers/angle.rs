//! Handlers for angles and their selection.

use adforge_core::angle::AngleContent;
use adforge_core::error::CoreError;
use adforge_core::product_status::ProductStatus;
use adforge_core::types::DbId;
use adforge_db::models::angle::{Angle, CreateAngle};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::handlers::ensure_listing_parent;
use crate::handlers::product::find_product;
use crate::query::AngleListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/products/{id}/angles?filter=
pub async fn list_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
    ApiQuery(params): ApiQuery<AngleListParams>,
) -> AppResult<Json<DataResponse<Vec<Angle>>>> {
    ensure_listing_parent("Product", product_id, state.store.find_product(product_id).await)?;
    let angles = state.selection.list(product_id, params.filter).await;
    Ok(Json(DataResponse { data: angles }))
}

/// POST /api/v1/products/{id}/angles
///
/// Used by the generation service to deliver angles while (or after) the
/// product's angle step runs.
pub async fn create(
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
    ApiJson(content): ApiJson<AngleContent>,
) -> AppResult<(StatusCode, Json<DataResponse<Angle>>)> {
    content.validate_content()?;

    let product = find_product(&state, product_id).await?;
    if !matches!(
        product.status,
        ProductStatus::AnglesGenerating | ProductStatus::AnglesGenerated
    ) {
        return Err(CoreError::Validation(format!(
            "Product {product_id} has status '{}'; angles can only be added once angle \
             generation has started",
            product.status
        ))
        .into());
    }

    let angle = state
        .store
        .create_angle(&CreateAngle {
            product_id,
            content,
        })
        .await?;
    tracing::info!(product_id, angle_id = angle.id, "Angle stored");
    Ok((StatusCode::CREATED, Json(DataResponse { data: angle })))
}

/// GET /api/v1/angles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Angle>>> {
    let angle = find_angle(&state, id).await?;
    Ok(Json(DataResponse { data: angle }))
}

/// POST /api/v1/angles/{id}/toggle-selection
pub async fn toggle_selection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Angle>>> {
    let angle = state.selection.toggle(id).await?;
    Ok(Json(DataResponse { data: angle }))
}

async fn find_angle(state: &AppState, id: DbId) -> AppResult<Angle> {
    state
        .store
        .find_angle(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Angle",
            id,
        }))
}
