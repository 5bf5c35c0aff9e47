use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::{MacroIndicatorRow, Trend};

/// Fetch all active indicators.
pub async fn list_active(pool: &PgPool) -> anyhow::Result<Vec<MacroIndicatorRow>> {
    let rows = sqlx::query_as::<_, MacroIndicatorRow>(
        "SELECT * FROM macro_indicators WHERE is_active = true ORDER BY code",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one indicator by code.
pub async fn get_by_code(pool: &PgPool, code: &str) -> anyhow::Result<Option<MacroIndicatorRow>> {
    let row = sqlx::query_as::<_, MacroIndicatorRow>(
        "SELECT * FROM macro_indicators WHERE code = $1",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Store a new reading: the current value moves to `previous_value`.
pub async fn record_value(
    pool: &PgPool,
    code: &str,
    value: Decimal,
    trend: Trend,
    source: &str,
) -> anyhow::Result<Option<MacroIndicatorRow>> {
    let row = sqlx::query_as::<_, MacroIndicatorRow>(
        r#"
        UPDATE macro_indicators
        SET previous_value = current_value,
            current_value = $2,
            trend = $3,
            source = $4,
            updated_at = NOW()
        WHERE code = $1
        RETURNING *
        "#,
    )
    .bind(code)
    .bind(value)
    .bind(trend.as_str())
    .bind(source)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
