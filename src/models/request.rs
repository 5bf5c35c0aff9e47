use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Objective;

/// Largest amount a `NUMERIC(18, 2)` money column holds: 9999999999999999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA763_FFFF, 0x0DE0_B6B3, 0, false, 2);

fn default_consider_macro() -> bool {
    true
}

/// Caller input for one recommendation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub client_id: Uuid,
    pub amount: Decimal,
    /// Falls back to the client's stated objective.
    #[serde(default)]
    pub objective: Option<Objective>,
    /// Falls back to the client's stated horizon.
    #[serde(default)]
    pub horizon_months: Option<i32>,
    #[serde(default = "default_consider_macro")]
    pub consider_macro: bool,
    /// Optional allowlist; empty means the whole eligible catalog.
    #[serde(default)]
    pub asset_ids: Vec<Uuid>,
}

/// Request parameters after defaults have been resolved against the profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationParams {
    pub amount: Decimal,
    pub objective: Objective,
    pub horizon_months: i32,
    pub consider_macro: bool,
}
