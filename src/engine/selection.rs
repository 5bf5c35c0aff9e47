use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::targets::AllocationTarget;
use crate::models::{Asset, AssetClass, PortfolioItem, RiskProfile};

/// Liquidity ceiling (days) for the conservative primary fixed income holding.
const CONSERVATIVE_MAX_LIQUIDITY_DAYS: i32 = 30;
/// Liquidity ceiling (days) preferred for the aggressive liquidity reserve.
const AGGRESSIVE_MAX_LIQUIDITY_DAYS: i32 = 1;

/// Picks assets for each class budget and returns items in priority order.
type SelectionStrategy = for<'a> fn(&AllocationTarget, &'a [Asset]) -> Vec<ItemDraft<'a>>;

/// An item before its priority is assigned.
#[derive(Debug, Clone)]
struct ItemDraft<'a> {
    asset: &'a Asset,
    percentage: Decimal,
    rationale: &'static str,
}

fn strategy_for(tier: RiskProfile) -> SelectionStrategy {
    match tier {
        RiskProfile::Conservative => conservative,
        RiskProfile::Moderate => moderate,
        RiskProfile::Aggressive => aggressive,
    }
}

/// Select and weight concrete assets for every class budget in `target`.
///
/// Budgets without an eligible candidate stay unallocated, so the item
/// percentages may add up to less than 100.
pub fn select_assets(
    tier: RiskProfile,
    target: &AllocationTarget,
    candidates: &[Asset],
    total_value: Decimal,
) -> Vec<PortfolioItem> {
    let strategy = strategy_for(tier);

    strategy(target, candidates)
        .into_iter()
        .enumerate()
        .map(|(i, draft)| PortfolioItem {
            asset_id: draft.asset.id,
            asset_code: draft.asset.code.clone(),
            asset_name: draft.asset.name.clone(),
            asset_class: draft.asset.class,
            percentage: draft.percentage,
            value: item_value(total_value, draft.percentage),
            expected_return: draft.asset.expected_return,
            rationale: draft.rationale.to_string(),
            priority: i as i32 + 1,
        })
        .collect()
}

pub fn round2(value: Decimal) -> Decimal {
    value.round_dp(2)
}

pub fn item_value(total_value: Decimal, percentage: Decimal) -> Decimal {
    round2(total_value * percentage / Decimal::ONE_HUNDRED)
}

// ---------------------------------------------------------------------------
// Ranking helpers (stable: ties keep catalog order)
// ---------------------------------------------------------------------------

fn of_class(candidates: &[Asset], class: AssetClass) -> Vec<&Asset> {
    candidates.iter().filter(|a| a.class == class).collect()
}

fn by_return_desc(a: &&Asset, b: &&Asset) -> Ordering {
    b.expected_return.cmp(&a.expected_return)
}

fn by_fee_then_return(a: &&Asset, b: &&Asset) -> Ordering {
    a.management_fee
        .cmp(&b.management_fee)
        .then_with(|| b.expected_return.cmp(&a.expected_return))
}

fn ranked<'a, F>(mut assets: Vec<&'a Asset>, order: F) -> Vec<&'a Asset>
where
    F: FnMut(&&'a Asset, &&'a Asset) -> Ordering,
{
    assets.sort_by(order);
    assets
}

/// Split `budget` across the top assets by `weights`, one asset per weight.
fn weighted<'a>(
    assets: &[&'a Asset],
    budget: Decimal,
    weights: &[Decimal],
    rationale: &'static str,
) -> Vec<ItemDraft<'a>> {
    assets
        .iter()
        .zip(weights)
        .map(|(asset, w)| ItemDraft {
            asset: *asset,
            percentage: round2(budget * *w),
            rationale,
        })
        .filter(|d| d.percentage > Decimal::ZERO)
        .collect()
}

/// Primary asset takes `primary_share` of the budget, the runner-up the rest.
fn primary_and_runner_up<'a>(
    primary: &'a Asset,
    runner_up: Option<&'a Asset>,
    budget: Decimal,
    primary_share: Decimal,
    rationales: (&'static str, &'static str),
) -> Vec<ItemDraft<'a>> {
    let first = round2(budget * primary_share);
    let mut drafts = vec![ItemDraft {
        asset: primary,
        percentage: first,
        rationale: rationales.0,
    }];

    let rest = round2(budget - first);
    if let Some(asset) = runner_up {
        if rest > Decimal::ZERO {
            drafts.push(ItemDraft {
                asset,
                percentage: rest,
                rationale: rationales.1,
            });
        }
    }

    drafts
}

fn whole_budget<'a>(asset: Option<&'a Asset>, budget: Decimal, rationale: &'static str) -> Vec<ItemDraft<'a>> {
    asset
        .map(|asset| ItemDraft {
            asset,
            percentage: round2(budget),
            rationale,
        })
        .into_iter()
        .filter(|d| d.percentage > Decimal::ZERO)
        .collect()
}

// ---------------------------------------------------------------------------
// Tier strategies
// ---------------------------------------------------------------------------

fn conservative<'a>(target: &AllocationTarget, candidates: &'a [Asset]) -> Vec<ItemDraft<'a>> {
    let mut drafts = Vec::new();

    if target.fixed_income > Decimal::ZERO {
        let fixed = ranked(of_class(candidates, AssetClass::FixedIncome), by_return_desc);
        let primary = fixed
            .iter()
            .find(|a| a.liquidity_days <= CONSERVATIVE_MAX_LIQUIDITY_DAYS)
            .copied();

        if let Some(primary) = primary {
            let runner_up = fixed.iter().find(|a| a.id != primary.id).copied();
            drafts.extend(primary_and_runner_up(
                primary,
                runner_up,
                target.fixed_income,
                Decimal::new(75, 2),
                (
                    "Core holding with low risk and good liquidity",
                    "Fixed income diversification to reduce risk",
                ),
            ));
        }
    }

    if target.fund_other > Decimal::ZERO {
        let funds = ranked(
            of_class(candidates, AssetClass::Fund)
                .into_iter()
                .filter(|a| a.risk == RiskProfile::Conservative)
                .collect(),
            by_fee_then_return,
        );
        drafts.extend(whole_budget(
            funds.first().copied(),
            target.fund_other,
            "Professionally managed fund for stability",
        ));
    }

    drafts
}

fn moderate<'a>(target: &AllocationTarget, candidates: &'a [Asset]) -> Vec<ItemDraft<'a>> {
    let mut drafts = Vec::new();

    if target.fixed_income > Decimal::ZERO {
        let fixed = ranked(of_class(candidates, AssetClass::FixedIncome), by_return_desc);
        if let Some(primary) = fixed.first().copied() {
            drafts.extend(primary_and_runner_up(
                primary,
                fixed.get(1).copied(),
                target.fixed_income,
                Decimal::new(60, 2),
                (
                    "Stable base of the portfolio",
                    "Fixed income diversification to reduce risk",
                ),
            ));
        }
    }

    if target.equity > Decimal::ZERO {
        let equities = ranked(
            of_class(candidates, AssetClass::Equity)
                .into_iter()
                .filter(|a| a.risk <= RiskProfile::Moderate)
                .collect(),
            by_return_desc,
        );
        let first = round2(target.equity * Decimal::TWO / Decimal::from(3));
        let split = [first, round2(target.equity - first)];

        for (i, (asset, pct)) in equities.iter().take(2).zip(split).enumerate() {
            if pct <= Decimal::ZERO {
                continue;
            }
            drafts.push(ItemDraft {
                asset: *asset,
                percentage: pct,
                rationale: if i == 0 {
                    "Equity exposure for growth"
                } else {
                    "Diversification within equities"
                },
            });
        }
    }

    if target.fund_other > Decimal::ZERO {
        let funds = ranked(
            of_class(candidates, AssetClass::Fund)
                .into_iter()
                .filter(|a| a.risk <= RiskProfile::Moderate)
                .collect(),
            by_fee_then_return,
        );
        drafts.extend(whole_budget(
            funds.first().copied(),
            target.fund_other,
            "Professional diversification and active management",
        ));
    }

    drafts
}

fn aggressive<'a>(target: &AllocationTarget, candidates: &'a [Asset]) -> Vec<ItemDraft<'a>> {
    let mut drafts = Vec::new();

    if target.fixed_income > Decimal::ZERO {
        let fixed = ranked(of_class(candidates, AssetClass::FixedIncome), by_return_desc);
        let reserve = fixed
            .iter()
            .find(|a| a.liquidity_days <= AGGRESSIVE_MAX_LIQUIDITY_DAYS)
            .or_else(|| fixed.first())
            .copied();
        drafts.extend(whole_budget(
            reserve,
            target.fixed_income,
            "Liquidity reserve anchoring the portfolio",
        ));
    }

    if target.equity > Decimal::ZERO {
        let equities = ranked(of_class(candidates, AssetClass::Equity), by_return_desc);
        let top: Vec<&Asset> = equities.into_iter().take(3).collect();
        drafts.extend(weighted(
            &top,
            target.equity,
            &[Decimal::new(40, 2), Decimal::new(35, 2), Decimal::new(25, 2)],
            "High growth potential",
        ));
    }

    if target.fund_other > Decimal::ZERO {
        let funds = ranked(of_class(candidates, AssetClass::Fund), by_return_desc);
        drafts.extend(whole_budget(
            funds.first().copied(),
            target.fund_other,
            "Active management to maximize returns",
        ));
    }

    drafts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
