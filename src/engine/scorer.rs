use rust_decimal::Decimal;

use crate::models::{AssetClass, Objective, PortfolioItem, RiskProfile};

const BASE_SCORE: Decimal = Decimal::from_parts(70, 0, 0, false, 2);
const BAND_MATCH_BONUS: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
const BAND_MISS_BONUS: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub expected_yield: Decimal,
    pub adequacy: Decimal,
    pub rationale: String,
}

/// Weighted average of item returns, in percent.
pub fn expected_yield(items: &[PortfolioItem]) -> Decimal {
    items
        .iter()
        .map(|i| i.percentage / Decimal::ONE_HUNDRED * i.expected_return)
        .sum()
}

/// Whether the fixed income share sits inside the band expected for the tier.
pub fn fixed_income_in_band(tier: RiskProfile, fixed_income_share: Decimal) -> bool {
    match tier {
        RiskProfile::Conservative => fixed_income_share >= Decimal::from(70),
        RiskProfile::Moderate => {
            fixed_income_share >= Decimal::from(40) && fixed_income_share <= Decimal::from(70)
        }
        RiskProfile::Aggressive => fixed_income_share <= Decimal::from(40),
    }
}

pub fn adequacy_score(tier: RiskProfile, items: &[PortfolioItem]) -> Decimal {
    let fixed_income_share: Decimal = items
        .iter()
        .filter(|i| i.asset_class == AssetClass::FixedIncome)
        .map(|i| i.percentage)
        .sum();

    let bonus = if fixed_income_in_band(tier, fixed_income_share) {
        BAND_MATCH_BONUS
    } else {
        BAND_MISS_BONUS
    };

    (BASE_SCORE + bonus).clamp(Decimal::ZERO, Decimal::ONE)
}

pub fn rationale(
    tier: RiskProfile,
    objective: Objective,
    horizon_months: i32,
    total_value: Decimal,
    expected_yield: Decimal,
) -> String {
    format!(
        "{} portfolio built for a {} objective over {} months. \
         Allocates {:.2} across the selected assets with an expected yield of {:.2}% per year.",
        tier.label(),
        objective.describe(),
        horizon_months,
        total_value,
        expected_yield,
    )
}

pub fn score(
    tier: RiskProfile,
    objective: Objective,
    horizon_months: i32,
    total_value: Decimal,
    items: &[PortfolioItem],
) -> Score {
    let expected_yield = expected_yield(items);

    Score {
        expected_yield,
        adequacy: adequacy_score(tier, items),
        rationale: rationale(tier, objective, horizon_months, total_value, expected_yield),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn item(class: AssetClass, pct: i64, ret: i64) -> PortfolioItem {
        PortfolioItem {
            asset_id: Uuid::new_v4(),
            asset_code: "X".into(),
            asset_name: "X".into(),
            asset_class: class,
            percentage: Decimal::from(pct),
            value: Decimal::ZERO,
            expected_return: Decimal::from(ret),
            rationale: String::new(),
            priority: 1,
        }
    }

    #[test]
    fn test_expected_yield_weighted_average() {
        let items = vec![
            item(AssetClass::FixedIncome, 60, 8),
            item(AssetClass::FixedIncome, 20, 6),
            item(AssetClass::Fund, 20, 5),
        ];
        assert_eq!(expected_yield(&items), Decimal::from(7));
    }

    #[test]
    fn test_adequacy_band_match() {
        let items = vec![item(AssetClass::FixedIncome, 80, 8), item(AssetClass::Fund, 20, 5)];
        assert_eq!(adequacy_score(RiskProfile::Conservative, &items), Decimal::ONE);
        assert_eq!(adequacy_score(RiskProfile::Aggressive, &items), Decimal::new(80, 2));
    }

    #[test]
    fn test_moderate_band_is_inclusive() {
        assert!(fixed_income_in_band(RiskProfile::Moderate, Decimal::from(40)));
        assert!(fixed_income_in_band(RiskProfile::Moderate, Decimal::from(70)));
        assert!(!fixed_income_in_band(RiskProfile::Moderate, Decimal::new(7001, 2)));
    }

    #[test]
    fn test_empty_portfolio_scores_in_range() {
        let score = score(RiskProfile::Moderate, Objective::LongTerm, 24, Decimal::from(1000), &[]);
        assert_eq!(score.expected_yield, Decimal::ZERO);
        assert!(score.adequacy >= Decimal::ZERO && score.adequacy <= Decimal::ONE);
    }

    #[test]
    fn test_rationale_is_deterministic() {
        let a = rationale(RiskProfile::Conservative, Objective::Retirement, 120, Decimal::from(10_000), Decimal::from(7));
        let b = rationale(RiskProfile::Conservative, Objective::Retirement, 120, Decimal::from(10_000), Decimal::from(7));
        assert_eq!(a, b);
        assert!(a.starts_with("Conservative portfolio"));
        assert!(a.contains("120 months"));
        assert!(a.contains("7.00%"));
    }
}
