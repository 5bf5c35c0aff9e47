//! Allocation engine: pure, synchronous portfolio construction.
//!
//! `build_portfolio` runs the three allocation steps (base targets, macro
//! adjustment, per-tier asset selection) and then scores the result. Nothing
//! in here touches I/O; the orchestrator in `services::recommendation`
//! gathers the inputs.

pub mod diversification;
pub mod scorer;
pub mod selection;
pub mod simulator;
pub mod targets;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{AllocationParams, ApprovalStatus, Asset, ClientProfile, MacroSnapshot, Portfolio};

pub use targets::{compute_targets, AllocationTarget};

/// Build a scored, unsaved portfolio for one recommendation run.
///
/// The macro snapshot is ignored unless `params.consider_macro` is set.
pub fn build_portfolio(
    profile: &ClientProfile,
    candidates: &[Asset],
    params: &AllocationParams,
    snapshot: Option<&MacroSnapshot>,
    now: DateTime<Utc>,
) -> Portfolio {
    let tier = profile.risk_profile;
    let snapshot = snapshot.filter(|_| params.consider_macro);

    let target = compute_targets(tier, snapshot);
    tracing::debug!(
        client_id = %profile.client_id,
        tier = %tier,
        fixed_income = %target.fixed_income,
        equity = %target.equity,
        fund_other = %target.fund_other,
        "Allocation targets computed"
    );

    let items = selection::select_assets(tier, &target, candidates, params.amount);
    let score = scorer::score(tier, params.objective, params.horizon_months, params.amount, &items);

    Portfolio {
        id: Uuid::new_v4(),
        client_id: profile.client_id,
        name: format!("{} portfolio - {}", tier.label(), now.format("%Y%m%d%H%M")),
        risk_profile: tier,
        objective: params.objective,
        horizon_months: params.horizon_months,
        total_value: params.amount,
        expected_yield: score.expected_yield,
        adequacy_score: score.adequacy,
        rationale: score.rationale,
        approval: ApprovalStatus::Pending,
        approved_at: None,
        generated_at: now,
        items,
    }
}
