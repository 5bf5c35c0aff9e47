use rust_decimal::Decimal;

use crate::models::{AssetClass, ClassShare, Concentration, DiversificationReport, Portfolio};

/// A single holding above this share flags the portfolio as concentrated.
const CONCENTRATION_LIMIT: i64 = 40;

pub fn analyze(portfolio: &Portfolio) -> DiversificationReport {
    let class_shares = AssetClass::ALL
        .into_iter()
        .map(|class| ClassShare {
            class,
            percentage: portfolio.class_percentage(class),
        })
        .collect();

    let max_item_percentage = portfolio
        .items
        .iter()
        .map(|i| i.percentage)
        .max()
        .unwrap_or(Decimal::ZERO);

    let concentration = if max_item_percentage > Decimal::from(CONCENTRATION_LIMIT) {
        Concentration::High
    } else {
        Concentration::Adequate
    };

    DiversificationReport {
        portfolio_id: portfolio.id,
        class_shares,
        item_count: portfolio.items.len(),
        max_item_percentage,
        concentration,
    }
}
