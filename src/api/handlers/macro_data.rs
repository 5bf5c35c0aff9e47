use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{IndicatorKind, MacroIndicator, MacroSnapshot};
use crate::services::macro_refresher::{self, RefreshReport};
use crate::AppState;

use super::ApiResponse;

#[derive(Serialize)]
pub struct MacroView {
    #[serde(flatten)]
    pub snapshot: MacroSnapshot,
    pub advisories: Vec<String>,
}

#[derive(Deserialize)]
pub struct IndicatorUpdate {
    pub value: Decimal,
    pub source: Option<String>,
}

/// GET /api/macro/snapshot
pub async fn snapshot(State(state): State<AppState>) -> Result<Json<ApiResponse<MacroView>>, AppError> {
    let snapshot = state.service.macro_snapshot().await?;
    let advisories = snapshot.advisories();
    Ok(ApiResponse::ok(MacroView { snapshot, advisories }))
}

/// POST /api/macro/refresh: pull the latest central bank readings
pub async fn refresh(State(state): State<AppState>) -> Result<Json<ApiResponse<RefreshReport>>, AppError> {
    let db = state
        .db
        .as_ref()
        .ok_or_else(|| AppError::UpstreamUnavailable("database not configured".into()))?;
    let client = state
        .bcb
        .as_ref()
        .ok_or_else(|| AppError::UpstreamUnavailable("central bank client not configured".into()))?;

    let report = macro_refresher::refresh_from_bcb(db, client).await;
    Ok(ApiResponse::ok(report))
}

/// PUT /api/macro/indicators/{code}: manual reading
pub async fn update_indicator(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<IndicatorUpdate>,
) -> Result<Json<ApiResponse<MacroIndicator>>, AppError> {
    let kind = IndicatorKind::from_code(&code)
        .ok_or_else(|| AppError::NotFound(format!("indicator {code}")))?;
    let db = state
        .db
        .as_ref()
        .ok_or_else(|| AppError::UpstreamUnavailable("database not configured".into()))?;

    let source = body.source.as_deref().unwrap_or("manual");
    let indicator = macro_refresher::update_indicator(db, kind, body.value, source)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("indicator {}", kind.code())))?;

    Ok(ApiResponse::ok(indicator))
}
