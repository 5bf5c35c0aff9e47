use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{DiversificationReport, Portfolio, ProjectionSeries, RecommendationRequest};
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ApprovalRequest {
    pub approved: bool,
}

#[derive(Deserialize)]
pub struct SimulationQuery {
    pub months: Option<i32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/recommendations: generate and store a new portfolio
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Portfolio>>), AppError> {
    let portfolio = state.service.generate(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(portfolio)))
}

/// GET /api/recommendations/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Portfolio>>, AppError> {
    let portfolio = state.service.get(id).await?;
    Ok(ApiResponse::ok(portfolio))
}

/// PATCH /api/recommendations/{id}/approval
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ApprovalRequest>,
) -> Result<Json<ApiResponse<Portfolio>>, AppError> {
    let portfolio = state.service.approve(id, body.approved).await?;
    Ok(ApiResponse::ok(portfolio))
}

/// GET /api/recommendations/{id}/simulation?months=N
pub async fn simulation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SimulationQuery>,
) -> Result<Json<ApiResponse<ProjectionSeries>>, AppError> {
    let months = query.months.unwrap_or(state.config.default_simulation_months);
    let series = state.service.simulate(id, months).await?;
    Ok(ApiResponse::ok(series))
}

/// GET /api/recommendations/{id}/diversification
pub async fn diversification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DiversificationReport>>, AppError> {
    let report = state.service.diversification(id).await?;
    Ok(ApiResponse::ok(report))
}
