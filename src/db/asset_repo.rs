use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Asset, AssetInput, AssetRow, RiskProfile};

/// Risk levels a client of `tier` may be offered, as stored in the assets table.
fn accepted_risk_levels(tier: RiskProfile) -> Vec<String> {
    [RiskProfile::Conservative, RiskProfile::Moderate, RiskProfile::Aggressive]
        .into_iter()
        .filter(|risk| tier.accepts(*risk))
        .map(|risk| risk.as_str().to_string())
        .collect()
}

/// Active assets compatible with the tier and affordable for `max_min_investment`.
///
/// Rows are returned in catalog order: risk ascending, then expected return
/// descending. An empty `allowlist` means no id restriction.
pub async fn list_eligible(
    pool: &PgPool,
    tier: RiskProfile,
    max_min_investment: Decimal,
    allowlist: &[Uuid],
) -> anyhow::Result<Vec<Asset>> {
    let rows = sqlx::query_as::<_, AssetRow>(
        r#"
        SELECT * FROM assets
        WHERE is_active = true
          AND risk_level = ANY($1)
          AND min_investment <= $2
          AND (cardinality($3::uuid[]) = 0 OR id = ANY($3))
        ORDER BY
            CASE risk_level
                WHEN 'conservative' THEN 0
                WHEN 'moderate' THEN 1
                ELSE 2
            END,
            expected_return DESC
        "#,
    )
    .bind(accepted_risk_levels(tier))
    .bind(max_min_investment)
    .bind(allowlist)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Asset::try_from).collect()
}

/// All active assets, grouped by class.
pub async fn list_active(pool: &PgPool) -> anyhow::Result<Vec<Asset>> {
    let rows = sqlx::query_as::<_, AssetRow>(
        "SELECT * FROM assets WHERE is_active = true ORDER BY asset_class, expected_return DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Asset::try_from).collect()
}

/// Whether another active asset already uses `code`.
pub async fn code_in_use(pool: &PgPool, code: &str, exclude: Option<Uuid>) -> anyhow::Result<bool> {
    let (in_use,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM assets
            WHERE is_active = true AND code = $1 AND ($2::uuid IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(code)
    .bind(exclude)
    .fetch_one(pool)
    .await?;

    Ok(in_use)
}

pub async fn insert_asset(pool: &PgPool, input: &AssetInput) -> anyhow::Result<Asset> {
    let row = sqlx::query_as::<_, AssetRow>(
        r#"
        INSERT INTO assets
            (code, name, description, asset_class, risk_level, expected_return,
             liquidity_days, min_investment, management_fee)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&input.code)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.class.as_str())
    .bind(input.risk.as_str())
    .bind(input.expected_return)
    .bind(input.liquidity_days)
    .bind(input.min_investment)
    .bind(input.management_fee)
    .fetch_one(pool)
    .await?;

    Asset::try_from(row)
}

/// Replace every registration field of an active asset.
pub async fn update_asset(pool: &PgPool, id: Uuid, input: &AssetInput) -> anyhow::Result<Option<Asset>> {
    let row = sqlx::query_as::<_, AssetRow>(
        r#"
        UPDATE assets SET
            code = $2, name = $3, description = $4, asset_class = $5, risk_level = $6,
            expected_return = $7, liquidity_days = $8, min_investment = $9, management_fee = $10
        WHERE id = $1 AND is_active = true
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.code)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.class.as_str())
    .bind(input.risk.as_str())
    .bind(input.expected_return)
    .bind(input.liquidity_days)
    .bind(input.min_investment)
    .bind(input.management_fee)
    .fetch_optional(pool)
    .await?;

    row.map(Asset::try_from).transpose()
}

/// Soft delete: the asset leaves the catalog but stays referenced by past portfolios.
pub async fn deactivate_asset(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("UPDATE assets SET is_active = false WHERE id = $1 AND is_active = true")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
