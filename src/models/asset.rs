use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{AssetClass, RiskProfile, MAX_AMOUNT};

/// Catalog asset as seen by the allocation engine. Read-only for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub class: AssetClass,
    pub risk: RiskProfile,
    /// Annualized, in percent.
    pub expected_return: Decimal,
    pub liquidity_days: i32,
    pub min_investment: Decimal,
    /// Annual management fee, in percent.
    pub management_fee: Decimal,
}

/// Database row for the assets table.
#[derive(Debug, Clone, FromRow)]
pub struct AssetRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub asset_class: String,
    pub risk_level: String,
    pub expected_return: Decimal,
    pub liquidity_days: i32,
    pub min_investment: Decimal,
    pub management_fee: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AssetRow> for Asset {
    type Error = anyhow::Error;

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        let class = AssetClass::from_str(&row.asset_class)
            .ok_or_else(|| anyhow::anyhow!("unknown asset class '{}' for asset {}", row.asset_class, row.id))?;
        let risk = RiskProfile::from_str(&row.risk_level)
            .ok_or_else(|| anyhow::anyhow!("unknown risk level '{}' for asset {}", row.risk_level, row.id))?;

        Ok(Asset {
            id: row.id,
            code: row.code,
            name: row.name,
            class,
            risk,
            expected_return: row.expected_return,
            liquidity_days: row.liquidity_days,
            min_investment: row.min_investment,
            management_fee: row.management_fee,
        })
    }
}

/// Registration payload for creating or replacing a catalog asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInput {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub class: AssetClass,
    pub risk: RiskProfile,
    pub expected_return: Decimal,
    #[serde(default)]
    pub liquidity_days: i32,
    #[serde(default)]
    pub min_investment: Decimal,
    #[serde(default)]
    pub management_fee: Decimal,
}

/// Largest magnitude a `NUMERIC(10, 4)` return column holds.
const MAX_RETURN: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 4);
/// Largest value a `NUMERIC(8, 4)` fee column holds.
const MAX_FEE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 4);

impl AssetInput {
    /// Codes are matched case-insensitively, so they are stored uppercased.
    pub fn normalized(mut self) -> Self {
        self.code = self.code.trim().to_uppercase();
        self.name = self.name.trim().to_string();
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("code is required".into());
        }
        if self.name.trim().is_empty() {
            return Err("name is required".into());
        }
        if self.expected_return.abs() > MAX_RETURN {
            return Err(format!("expected_return out of range: {}", self.expected_return));
        }
        if self.liquidity_days < 0 {
            return Err(format!("liquidity_days must not be negative, got {}", self.liquidity_days));
        }
        if self.min_investment.is_sign_negative() || self.min_investment > MAX_AMOUNT {
            return Err(format!("min_investment out of range: {}", self.min_investment));
        }
        if self.management_fee.is_sign_negative() || self.management_fee > MAX_FEE {
            return Err(format!("management_fee out of range: {}", self.management_fee));
        }
        Ok(())
    }
}
