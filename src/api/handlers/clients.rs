use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Client, ClientInput, ClientProfile, Portfolio};
use crate::AppState;

use super::ApiResponse;

/// GET /api/clients/{id}/profile
pub async fn profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClientProfile>>, AppError> {
    let profile = state.service.profile(id).await?;
    Ok(ApiResponse::ok(profile))
}

/// GET /api/clients/{id}/recommendations: newest first
pub async fn recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Portfolio>>>, AppError> {
    let portfolios = state.service.list_for_client(id).await?;
    Ok(ApiResponse::ok(portfolios))
}

/// POST /api/clients: register a client
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<ClientInput>,
) -> Result<(StatusCode, Json<ApiResponse<Client>>), AppError> {
    let client = state.registry.create_client(body).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(client)))
}

/// PUT /api/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ClientInput>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    let client = state.registry.update_client(id, body).await?;
    Ok(ApiResponse::ok(client))
}

/// DELETE /api/clients/{id}: soft delete, history is kept
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.registry.delete_client(id).await?;
    Ok(ApiResponse::ok(()))
}
