use async_trait::async_trait;
use metrics::counter;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tokio::time::{interval, Duration};

use crate::bcb::{BcbClient, BcbError, SgsSeries};
use crate::db::macro_repo;
use crate::models::{IndicatorKind, MacroIndicator, Trend};

/// Changes this small (in indicator units) count as Stable.
const STABLE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
const BCB_SOURCE: &str = "BCB";

#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub updated: Vec<MacroIndicator>,
    pub failed: Vec<String>,
}

pub fn derive_trend(previous: Decimal, current: Decimal) -> Trend {
    let delta = current - previous;
    if delta.abs() <= STABLE_TOLERANCE {
        Trend::Stable
    } else if delta > Decimal::ZERO {
        Trend::Up
    } else {
        Trend::Down
    }
}

/// Store a new value for one indicator, deriving its trend from the stored one.
/// Returns `None` when the indicator does not exist.
pub async fn update_indicator(
    pool: &PgPool,
    kind: IndicatorKind,
    value: Decimal,
    source: &str,
) -> anyhow::Result<Option<MacroIndicator>> {
    let Some(current) = macro_repo::get_by_code(pool, kind.code()).await? else {
        return Ok(None);
    };

    let trend = derive_trend(current.current_value, value);
    let row = macro_repo::record_value(pool, kind.code(), value, trend, source).await?;

    match row {
        Some(row) => row.into_indicator(),
        None => Ok(None),
    }
}

/// Destination for fresh indicator readings.
#[async_trait]
pub trait IndicatorWriter: Send + Sync {
    /// `None` when the indicator does not exist.
    async fn write(&self, kind: IndicatorKind, value: Decimal, source: &str)
        -> anyhow::Result<Option<MacroIndicator>>;
}

#[async_trait]
impl IndicatorWriter for PgPool {
    async fn write(
        &self,
        kind: IndicatorKind,
        value: Decimal,
        source: &str,
    ) -> anyhow::Result<Option<MacroIndicator>> {
        update_indicator(self, kind, value, source).await
    }
}

/// Fetch the latest central bank readings concurrently and store them.
///
/// A failing series is reported and skipped; the others are still stored.
pub async fn refresh_from_bcb(pool: &PgPool, client: &BcbClient) -> RefreshReport {
    let (selic, ipca, cdi, usd) = tokio::join!(
        client.get_latest(SgsSeries::Selic),
        client.get_latest(SgsSeries::Ipca),
        client.get_latest(SgsSeries::Cdi),
        client.get_latest(SgsSeries::UsdPtax),
    );

    let readings = SgsSeries::ALL.into_iter().zip([selic, ipca, cdi, usd]).collect();
    let report = store_readings(pool, readings).await;

    counter!("macro_refreshes_total").increment(1);
    tracing::info!(
        updated = report.updated.len(),
        failed = report.failed.len(),
        "Macro indicators refreshed from BCB"
    );

    report
}

/// Write each successful reading. Fetch and write failures land in `failed`.
pub async fn store_readings<W>(
    writer: &W,
    readings: Vec<(SgsSeries, Result<Option<Decimal>, BcbError>)>,
) -> RefreshReport
where
    W: IndicatorWriter + ?Sized,
{
    let mut report = RefreshReport {
        updated: Vec::new(),
        failed: Vec::new(),
    };

    for (series, result) in readings {
        let kind = series.indicator();
        match result {
            Ok(Some(value)) => match writer.write(kind, value, BCB_SOURCE).await {
                Ok(Some(indicator)) => report.updated.push(indicator),
                Ok(None) => {
                    tracing::warn!(code = kind.code(), "Indicator missing from macro_indicators, skipping");
                    report.failed.push(kind.code().to_string());
                }
                Err(e) => {
                    tracing::error!(error = %e, code = kind.code(), "Storing indicator failed");
                    report.failed.push(kind.code().to_string());
                }
            },
            Ok(None) => {
                tracing::warn!(series = series.code(), "BCB series returned no observations");
                report.failed.push(kind.code().to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, series = series.code(), "BCB fetch failed");
                report.failed.push(kind.code().to_string());
            }
        }
    }

    report
}

/// Periodically refresh macro indicators from the central bank.
pub async fn run_macro_refresher(pool: PgPool, client: BcbClient, interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));

    tracing::info!(interval_secs, "Macro refresher started");

    loop {
        ticker.tick().await;

        let report = refresh_from_bcb(&pool, &client).await;
        if !report.failed.is_empty() {
            tracing::warn!(failed = ?report.failed, "Macro refresh incomplete");
        }
    }
}
