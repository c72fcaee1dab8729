//! Handlers for products and their generation lifecycle.

use std::time::Duration;

use adforge_core::error::CoreError;
use adforge_core::product_status::{validate_external_report, ProductStatus, ProductTrigger};
use adforge_core::types::DbId;
use adforge_db::models::product::{CreateProduct, Product};
use adforge_pipeline::WaitError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::handlers::project::find_project;
use crate::query::WaitParams;
use crate::response::{DataResponse, ProductView};
use crate::state::AppState;

/// Request body for creating a product under a project.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub notes: Option<String>,
}

/// Status report from the external generation service.
#[derive(Debug, Deserialize)]
pub struct StatusReport {
    pub status: ProductStatus,
}

/// Outcome of a completion wait.
#[derive(Debug, Serialize)]
pub struct WaitOutcome {
    pub product_id: DbId,
    pub status: Option<ProductStatus>,
    /// False if the wait timed out while generation was still running.
    pub settled: bool,
}

/// POST /api/v1/projects/{id}/products
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ApiJson(input): ApiJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductView>>)> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    find_project(&state, project_id).await?;

    let product = state
        .store
        .create_product(&CreateProduct {
            project_id,
            name: input.name,
            notes: input.notes,
        })
        .await?;
    tracing::info!(project_id, product_id = product.id, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: product.into(),
        }),
    ))
}

/// GET /api/v1/projects/{id}/products
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProductView>>>> {
    find_project(&state, project_id).await?;
    let products = state.store.list_products(project_id).await?;
    Ok(Json(DataResponse {
        data: products.into_iter().map(ProductView::from).collect(),
    }))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductView>>> {
    let product = find_product(&state, id).await?;
    Ok(Json(DataResponse {
        data: product.into(),
    }))
}

/// POST /api/v1/products/{id}/generate-details
pub async fn generate_details(
    state: State<AppState>,
    path: Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductView>>)> {
    run_trigger(state, path, ProductTrigger::GenerateDetails).await
}

/// POST /api/v1/products/{id}/generate-angles
pub async fn generate_angles(
    state: State<AppState>,
    path: Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductView>>)> {
    run_trigger(state, path, ProductTrigger::GenerateAngles).await
}

async fn run_trigger(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    trigger: ProductTrigger,
) -> AppResult<(StatusCode, Json<DataResponse<ProductView>>)> {
    state.dispatcher.trigger(id, trigger).await?;
    let product = find_product(&state, id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: product.into(),
        }),
    ))
}

/// PUT /api/v1/products/{id}/status
///
/// Called by the generation service to report completion or failure of the
/// step currently running.
pub async fn report_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ApiJson(report): ApiJson<StatusReport>,
) -> AppResult<Json<DataResponse<ProductView>>> {
    let product = find_product(&state, id).await?;
    validate_external_report(product.status, report.status)?;

    let applied = state
        .store
        .compare_and_set_status(id, product.status, report.status)
        .await?;
    if !applied {
        return Err(CoreError::Conflict(format!(
            "Product {id} left status '{}' before the report was applied",
            product.status
        ))
        .into());
    }
    tracing::info!(product_id = id, from = %product.status, to = %report.status, "Status reported");

    let product = find_product(&state, id).await?;
    Ok(Json(DataResponse {
        data: product.into(),
    }))
}

/// GET /api/v1/products/{id}/status/wait?timeout_secs=
///
/// Long-polls until the product is no longer generating. The wait is
/// bounded by `COMPLETION_WAIT_MAX_SECS` and by the request timeout.
pub async fn wait_for_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ApiQuery(params): ApiQuery<WaitParams>,
) -> AppResult<Json<DataResponse<WaitOutcome>>> {
    let cap = state
        .config
        .completion_wait_max_secs
        .min(state.config.request_timeout_secs.saturating_sub(1));
    let timeout = Duration::from_secs(params.timeout_secs.unwrap_or(cap).min(cap));

    let outcome = match state
        .watcher
        .wait_with_timeout(id, timeout, &state.shutdown)
        .await
    {
        Ok(status) => WaitOutcome {
            product_id: id,
            status: Some(status),
            settled: true,
        },
        Err(WaitError::TimedOut { last_status, .. }) => WaitOutcome {
            product_id: id,
            status: last_status,
            settled: false,
        },
        Err(e) => return Err(e.into()),
    };
    Ok(Json(DataResponse { data: outcome }))
}

pub(crate) async fn find_product(state: &AppState, id: DbId) -> AppResult<Product> {
    state
        .store
        .find_product(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))
}
