use rust_decimal::Decimal;

use crate::errors::AppError;
use crate::models::{MonthlyProjection, Portfolio, ProjectionSeries};

const MONTHS_PER_YEAR: i64 = 12;

/// Longest projection horizon accepted: 100 years.
pub const MAX_SIMULATION_MONTHS: i32 = 1200;

/// Reject horizons outside `1..=MAX_SIMULATION_MONTHS`.
pub fn check_months(months: i32) -> Result<(), AppError> {
    if !(1..=MAX_SIMULATION_MONTHS).contains(&months) {
        return Err(AppError::InvalidArgument(format!(
            "months must be between 1 and {MAX_SIMULATION_MONTHS}, got {months}"
        )));
    }
    Ok(())
}

/// Project month-by-month compounding of the portfolio's expected yield.
///
/// The monthly rate is the annual yield divided by 12. The running value is
/// kept at full precision; reported figures are rounded to 2 decimals.
pub fn simulate(portfolio: &Portfolio, months: i32) -> Result<ProjectionSeries, AppError> {
    check_months(months)?;
    if portfolio.total_value.is_zero() {
        return Err(AppError::InvalidArgument(format!(
            "portfolio {} has no invested value to simulate",
            portfolio.id
        )));
    }

    let initial = portfolio.total_value;
    let monthly_rate = portfolio.expected_yield / Decimal::from(MONTHS_PER_YEAR);
    let growth = Decimal::ONE + monthly_rate / Decimal::ONE_HUNDRED;

    let mut value = initial;
    let mut projections = Vec::with_capacity(months as usize);
    for month in 1..=months {
        value = value.checked_mul(growth).ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "projected value overflows after {month} months at {}% a year",
                portfolio.expected_yield
            ))
        })?;
        projections.push(MonthlyProjection {
            month,
            invested: initial.round_dp(2),
            cumulative_gain: (value - initial).round_dp(2),
            total: value.round_dp(2),
        });
    }

    let total_gain = value - initial;

    Ok(ProjectionSeries {
        portfolio_id: portfolio.id,
        initial_value: initial.round_dp(2),
        final_value: value.round_dp(2),
        total_gain: total_gain.round_dp(2),
        gain_percentage: (total_gain / initial)
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|pct| pct.round_dp(2))
            .ok_or_else(|| AppError::InvalidArgument("projected gain percentage overflows".into()))?,
        projections,
    })
}
