use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Asset, AssetInput};
use crate::AppState;

use super::ApiResponse;

/// GET /api/assets: active catalog
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Asset>>>, AppError> {
    let assets = state.service.assets().await?;
    Ok(ApiResponse::ok(assets))
}

/// POST /api/assets: add an asset to the catalog
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<AssetInput>,
) -> Result<(StatusCode, Json<ApiResponse<Asset>>), AppError> {
    let asset = state.registry.create_asset(body).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(asset)))
}

/// PUT /api/assets/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AssetInput>,
) -> Result<Json<ApiResponse<Asset>>, AppError> {
    let asset = state.registry.update_asset(id, body).await?;
    Ok(ApiResponse::ok(asset))
}

/// DELETE /api/assets/{id}: soft delete, stored portfolios keep referencing it
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.registry.delete_asset(id).await?;
    Ok(ApiResponse::ok(()))
}
