use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AssetClass, MacroSnapshot, RiskProfile, Scenario};

/// Fixed income never exceeds this share after macro adjustments.
const FIXED_INCOME_CAP: i64 = 80;
/// Rule A fires when the policy rate is at or above this level (percent).
const HIGH_POLICY_RATE: i64 = 10;
const RULE_A_SHIFT: i64 = 10;
const RULE_B_SHIFT: i64 = 5;

/// Class budgets in percent of the total portfolio value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationTarget {
    pub fixed_income: Decimal,
    pub equity: Decimal,
    /// Fund/Other block: always the remainder of the base split.
    pub fund_other: Decimal,
}

impl AllocationTarget {
    pub fn base(tier: RiskProfile) -> Self {
        let (fixed_income, equity) = match tier {
            RiskProfile::Conservative => (80, 0),
            RiskProfile::Moderate => (50, 30),
            RiskProfile::Aggressive => (20, 60),
        };
        let fixed_income = Decimal::from(fixed_income);
        let equity = Decimal::from(equity);

        Self {
            fixed_income,
            equity,
            fund_other: Decimal::ONE_HUNDRED - (fixed_income + equity),
        }
    }

    pub fn total(&self) -> Decimal {
        self.fixed_income + self.equity + self.fund_other
    }

    /// Budget for an asset class. Classes outside the three blocks get none.
    pub fn budget_for(&self, class: AssetClass) -> Decimal {
        match class {
            AssetClass::FixedIncome => self.fixed_income,
            AssetClass::Equity => self.equity,
            AssetClass::Fund => self.fund_other,
            AssetClass::Crypto | AssetClass::Commodity => Decimal::ZERO,
        }
    }
}

/// Base targets for the tier, adjusted by the macro snapshot when present.
pub fn compute_targets(tier: RiskProfile, snapshot: Option<&MacroSnapshot>) -> AllocationTarget {
    let base = AllocationTarget::base(tier);
    match snapshot {
        Some(snapshot) => apply_macro_rules(tier, base, snapshot),
        None => base,
    }
}

/// Rule A then Rule B, each on the output of the previous one.
pub fn apply_macro_rules(
    tier: RiskProfile,
    target: AllocationTarget,
    snapshot: &MacroSnapshot,
) -> AllocationTarget {
    let target = high_rate_rule(target, snapshot);
    equity_drawdown_rule(tier, target, snapshot)
}

/// Rule A: high policy rate in a cautious scenario shifts up to 10 points into
/// fixed income, taken from equity and fund/other pro rata.
fn high_rate_rule(target: AllocationTarget, snapshot: &MacroSnapshot) -> AllocationTarget {
    if snapshot.policy_rate() < Decimal::from(HIGH_POLICY_RATE) || snapshot.scenario != Scenario::Cautious {
        return target;
    }

    let shift = Decimal::from(RULE_A_SHIFT).min(Decimal::from(FIXED_INCOME_CAP) - target.fixed_income);
    let others = target.equity + target.fund_other;
    if shift <= Decimal::ZERO || others <= Decimal::ZERO {
        return target;
    }

    tracing::debug!(shift = %shift, "Macro rule A: high policy rate in cautious scenario");

    AllocationTarget {
        fixed_income: target.fixed_income + shift,
        equity: target.equity - shift * (target.equity / others),
        fund_other: target.fund_other - shift * (target.fund_other / others),
    }
}

/// Rule B: a falling equity index moves up to 5 equity points into fixed
/// income for conservative clients.
fn equity_drawdown_rule(
    tier: RiskProfile,
    target: AllocationTarget,
    snapshot: &MacroSnapshot,
) -> AllocationTarget {
    if tier != RiskProfile::Conservative || snapshot.equity_index_delta() >= Decimal::ZERO {
        return target;
    }

    let shift = Decimal::from(RULE_B_SHIFT).min(target.equity);

    AllocationTarget {
        fixed_income: (target.fixed_income + shift).min(Decimal::from(FIXED_INCOME_CAP)),
        equity: target.equity - shift,
        fund_other: target.fund_other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
