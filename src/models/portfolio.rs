use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::{AssetClass, Objective, RiskProfile};

// ---------------------------------------------------------------------------
// Approval
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn from_decision(approved: bool) -> Self {
        if approved {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Portfolio + items
// ---------------------------------------------------------------------------

/// One holding of a recommended portfolio.
///
/// `value == total_value * percentage / 100`, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub asset_id: Uuid,
    pub asset_code: String,
    pub asset_name: String,
    pub asset_class: AssetClass,
    pub percentage: Decimal,
    pub value: Decimal,
    pub expected_return: Decimal,
    pub rationale: String,
    /// 1-based, equal to insertion order.
    pub priority: i32,
}

/// A generated recommendation. Items never change after creation; only the
/// approval fields are updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub risk_profile: RiskProfile,
    pub objective: Objective,
    pub horizon_months: i32,
    pub total_value: Decimal,
    pub expected_yield: Decimal,
    pub adequacy_score: Decimal,
    pub rationale: String,
    pub approval: ApprovalStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<PortfolioItem>,
}

impl Portfolio {
    /// Sum of item percentages for one asset class.
    pub fn class_percentage(&self, class: AssetClass) -> Decimal {
        self.items
            .iter()
            .filter(|i| i.asset_class == class)
            .map(|i| i.percentage)
            .sum()
    }

    pub fn allocated_percentage(&self) -> Decimal {
        self.items.iter().map(|i| i.percentage).sum()
    }
}

/// Database row for the portfolios table.
#[derive(Debug, Clone, FromRow)]
pub struct PortfolioRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub risk_profile: String,
    pub objective: String,
    pub horizon_months: i32,
    pub total_value: Decimal,
    pub expected_yield: Decimal,
    pub adequacy_score: Decimal,
    pub rationale: String,
    pub approval_status: String,
    pub approved_at: Option<DateTime<Utc>>,
    pub generated_at: DateTime<Utc>,
}

/// Database row for the portfolio_items table.
#[derive(Debug, Clone, FromRow)]
pub struct PortfolioItemRow {
    pub portfolio_id: Uuid,
    pub asset_id: Uuid,
    pub asset_code: String,
    pub asset_name: String,
    pub asset_class: String,
    pub percentage: Decimal,
    pub value: Decimal,
    pub expected_return: Decimal,
    pub rationale: String,
    pub priority: i32,
}

impl PortfolioItemRow {
    pub fn into_item(self) -> anyhow::Result<PortfolioItem> {
        let asset_class = AssetClass::from_str(&self.asset_class)
            .ok_or_else(|| anyhow::anyhow!("unknown asset class '{}' in portfolio item", self.asset_class))?;

        Ok(PortfolioItem {
            asset_id: self.asset_id,
            asset_code: self.asset_code,
            asset_name: self.asset_name,
            asset_class,
            percentage: self.percentage,
            value: self.value,
            expected_return: self.expected_return,
            rationale: self.rationale,
            priority: self.priority,
        })
    }
}

impl PortfolioRow {
    pub fn into_portfolio(self, items: Vec<PortfolioItem>) -> anyhow::Result<Portfolio> {
        let risk_profile = RiskProfile::from_str(&self.risk_profile)
            .ok_or_else(|| anyhow::anyhow!("unknown risk profile '{}' on portfolio {}", self.risk_profile, self.id))?;
        let objective = Objective::from_str(&self.objective)
            .ok_or_else(|| anyhow::anyhow!("unknown objective '{}' on portfolio {}", self.objective, self.id))?;
        let approval = ApprovalStatus::from_str(&self.approval_status)
            .ok_or_else(|| anyhow::anyhow!("unknown approval status '{}' on portfolio {}", self.approval_status, self.id))?;

        Ok(Portfolio {
            id: self.id,
            client_id: self.client_id,
            name: self.name,
            risk_profile,
            objective,
            horizon_months: self.horizon_months,
            total_value: self.total_value,
            expected_yield: self.expected_yield,
            adequacy_score: self.adequacy_score,
            rationale: self.rationale,
            approval,
            approved_at: self.approved_at,
            generated_at: self.generated_at,
            items,
        })
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjection {
    pub month: i32,
    pub invested: Decimal,
    pub cumulative_gain: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSeries {
    pub portfolio_id: Uuid,
    pub initial_value: Decimal,
    pub final_value: Decimal,
    pub total_gain: Decimal,
    pub gain_percentage: Decimal,
    pub projections: Vec<MonthlyProjection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concentration {
    High,
    Adequate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassShare {
    pub class: AssetClass,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationReport {
    pub portfolio_id: Uuid,
    pub class_shares: Vec<ClassShare>,
    pub item_count: usize,
    pub max_item_percentage: Decimal,
    pub concentration: Concentration,
}

impl DiversificationReport {
    pub fn share_of(&self, class: AssetClass) -> Decimal {
        self.class_shares
            .iter()
            .find(|s| s.class == class)
            .map(|s| s.percentage)
            .unwrap_or(Decimal::ZERO)
    }
}
