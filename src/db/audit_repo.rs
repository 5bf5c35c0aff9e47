use sqlx::{Executor, Postgres};

use crate::models::AuditEntry;

/// Insert one recommendation log row.
///
/// Generic over the executor so the success entry can join the portfolio
/// transaction while failure entries go straight to the pool.
pub async fn insert_log<'e, E>(executor: E, entry: &AuditEntry) -> anyhow::Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO recommendation_logs
            (client_id, portfolio_id, parameters, result, elapsed_ms,
             algorithm_version, success, error, processed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(entry.client_id)
    .bind(entry.portfolio_id)
    .bind(&entry.parameters)
    .bind(&entry.result)
    .bind(entry.elapsed_ms)
    .bind(&entry.algorithm_version)
    .bind(entry.success)
    .bind(&entry.error)
    .bind(entry.processed_at)
    .execute(executor)
    .await?;

    Ok(())
}
