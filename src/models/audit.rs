use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{Portfolio, RecommendationRequest};

pub const ALGORITHM_VERSION: &str = "1.0";

/// Immutable record of one recommendation run, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub client_id: Uuid,
    pub portfolio_id: Option<Uuid>,
    pub parameters: Value,
    pub result: Value,
    pub elapsed_ms: i64,
    pub algorithm_version: String,
    pub success: bool,
    pub error: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn success(request: &RecommendationRequest, portfolio: &Portfolio, elapsed_ms: i64) -> Self {
        let items: Vec<Value> = portfolio
            .items
            .iter()
            .map(|i| {
                json!({
                    "asset_id": i.asset_id,
                    "percentage": i.percentage,
                    "value": i.value,
                })
            })
            .collect();

        Self {
            client_id: request.client_id,
            portfolio_id: Some(portfolio.id),
            parameters: request_json(request),
            result: json!({ "portfolio_id": portfolio.id, "items": items }),
            elapsed_ms,
            algorithm_version: ALGORITHM_VERSION.to_string(),
            success: true,
            error: None,
            processed_at: Utc::now(),
        }
    }

    pub fn failure(request: &RecommendationRequest, elapsed_ms: i64, error: &str) -> Self {
        Self {
            client_id: request.client_id,
            portfolio_id: None,
            parameters: request_json(request),
            result: Value::Null,
            elapsed_ms,
            algorithm_version: ALGORITHM_VERSION.to_string(),
            success: false,
            error: Some(error.to_string()),
            processed_at: Utc::now(),
        }
    }
}

fn request_json(request: &RecommendationRequest) -> Value {
    serde_json::to_value(request).unwrap_or(Value::Null)
}
