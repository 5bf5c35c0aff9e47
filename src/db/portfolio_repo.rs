use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::audit_repo;
use crate::models::portfolio::{PortfolioItemRow, PortfolioRow};
use crate::models::{ApprovalStatus, AuditEntry, Portfolio, PortfolioItem};

/// Insert the portfolio header, its items and the success audit row in one
/// transaction. Nothing is written if any statement fails.
pub async fn insert_with_items(
    pool: &PgPool,
    portfolio: &Portfolio,
    audit: &AuditEntry,
) -> anyhow::Result<Uuid> {
    let mut tx = pool.begin().await.context("begin transaction failed")?;

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO portfolios
            (id, client_id, name, risk_profile, objective, horizon_months, total_value,
             expected_yield, adequacy_score, rationale, approval_status, approved_at, generated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING id
        "#,
    )
    .bind(portfolio.id)
    .bind(portfolio.client_id)
    .bind(&portfolio.name)
    .bind(portfolio.risk_profile.as_str())
    .bind(portfolio.objective.as_str())
    .bind(portfolio.horizon_months)
    .bind(portfolio.total_value)
    .bind(portfolio.expected_yield)
    .bind(portfolio.adequacy_score)
    .bind(&portfolio.rationale)
    .bind(portfolio.approval.as_str())
    .bind(portfolio.approved_at)
    .bind(portfolio.generated_at)
    .fetch_one(&mut *tx)
    .await
    .context("insert portfolios failed")?;

    for item in &portfolio.items {
        insert_item(&mut tx, id, item).await?;
    }

    audit_repo::insert_log(&mut *tx, audit)
        .await
        .context("insert recommendation_logs failed")?;

    tx.commit().await.context("commit transaction failed")?;
    Ok(id)
}

async fn insert_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    portfolio_id: Uuid,
    item: &PortfolioItem,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO portfolio_items
            (portfolio_id, asset_id, asset_code, asset_name, asset_class, percentage,
             value, expected_return, rationale, priority)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(portfolio_id)
    .bind(item.asset_id)
    .bind(&item.asset_code)
    .bind(&item.asset_name)
    .bind(item.asset_class.as_str())
    .bind(item.percentage)
    .bind(item.value)
    .bind(item.expected_return)
    .bind(&item.rationale)
    .bind(item.priority)
    .execute(&mut **tx)
    .await
    .with_context(|| format!("insert portfolio_items failed for asset {}", item.asset_code))?;

    Ok(())
}

/// Fetch a portfolio with its items in priority order.
pub async fn get_portfolio(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Portfolio>> {
    let row = sqlx::query_as::<_, PortfolioRow>(
        r#"
        SELECT id, client_id, name, risk_profile, objective, horizon_months, total_value,
               expected_yield, adequacy_score, rationale, approval_status, approved_at, generated_at
        FROM portfolios
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let items = get_items(pool, &[row.id]).await?;
    let items = items.into_iter().map(PortfolioItemRow::into_item).collect::<anyhow::Result<_>>()?;

    Ok(Some(row.into_portfolio(items)?))
}

/// All portfolios generated for a client, newest first.
pub async fn list_for_client(pool: &PgPool, client_id: Uuid) -> anyhow::Result<Vec<Portfolio>> {
    let rows = sqlx::query_as::<_, PortfolioRow>(
        r#"
        SELECT id, client_id, name, risk_profile, objective, horizon_months, total_value,
               expected_yield, adequacy_score, rationale, approval_status, approved_at, generated_at
        FROM portfolios
        WHERE client_id = $1
        ORDER BY generated_at DESC
        "#,
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut item_rows = get_items(pool, &ids).await?;

    let mut portfolios = Vec::with_capacity(rows.len());
    for row in rows {
        let (mine, rest): (Vec<_>, Vec<_>) = item_rows.into_iter().partition(|i| i.portfolio_id == row.id);
        item_rows = rest;
        let items = mine.into_iter().map(PortfolioItemRow::into_item).collect::<anyhow::Result<_>>()?;
        portfolios.push(row.into_portfolio(items)?);
    }

    Ok(portfolios)
}

async fn get_items(pool: &PgPool, portfolio_ids: &[Uuid]) -> anyhow::Result<Vec<PortfolioItemRow>> {
    let rows = sqlx::query_as::<_, PortfolioItemRow>(
        r#"
        SELECT portfolio_id, asset_id, asset_code, asset_name, asset_class, percentage,
               value, expected_return, rationale, priority
        FROM portfolio_items
        WHERE portfolio_id = ANY($1)
        ORDER BY portfolio_id, priority
        "#,
    )
    .bind(portfolio_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Record an approval decision. Returns `None` for an unknown id.
pub async fn set_approval(
    pool: &PgPool,
    id: Uuid,
    status: ApprovalStatus,
    at: DateTime<Utc>,
) -> anyhow::Result<Option<Portfolio>> {
    let updated = sqlx::query(
        "UPDATE portfolios SET approval_status = $2, approved_at = $3 WHERE id = $1",
    )
    .bind(id)
    .bind(status.as_str())
    .bind(at)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Ok(None);
    }

    get_portfolio(pool, id).await
}
