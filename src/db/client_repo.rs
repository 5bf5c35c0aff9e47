use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Client, ClientConflict, ClientInput};

/// Fetch an active client by id. Inactive clients are treated as missing.
pub async fn get_active_client(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(
        "SELECT * FROM clients WHERE id = $1 AND is_active = true",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

/// Whether `tax_id` or `email` is already held by another active client.
pub async fn find_conflict(
    pool: &PgPool,
    tax_id: &str,
    email: &str,
    exclude: Option<Uuid>,
) -> anyhow::Result<Option<ClientConflict>> {
    let row: Option<(bool, bool)> = sqlx::query_as(
        r#"
        SELECT bool_or(tax_id = $1), bool_or(email = $2)
        FROM clients
        WHERE is_active = true
          AND (tax_id = $1 OR email = $2)
          AND ($3::uuid IS NULL OR id <> $3)
        HAVING count(*) > 0
        "#,
    )
    .bind(tax_id)
    .bind(email)
    .bind(exclude)
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some((true, _)) => Some(ClientConflict::TaxId),
        Some((_, true)) => Some(ClientConflict::Email),
        _ => None,
    })
}

pub async fn insert_client(pool: &PgPool, input: &ClientInput) -> anyhow::Result<Client> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients
            (name, email, tax_id, birth_date, monthly_income, available_capital,
             risk_profile, objective, horizon_months)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.tax_id)
    .bind(input.birth_date)
    .bind(input.monthly_income)
    .bind(input.available_capital)
    .bind(input.risk_profile.as_str())
    .bind(input.objective.as_str())
    .bind(input.horizon_months)
    .fetch_one(pool)
    .await?;

    Ok(client)
}

/// Replace every registration field of an active client.
pub async fn update_client(pool: &PgPool, id: Uuid, input: &ClientInput) -> anyhow::Result<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients SET
            name = $2, email = $3, tax_id = $4, birth_date = $5, monthly_income = $6,
            available_capital = $7, risk_profile = $8, objective = $9, horizon_months = $10
        WHERE id = $1 AND is_active = true
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.tax_id)
    .bind(input.birth_date)
    .bind(input.monthly_income)
    .bind(input.available_capital)
    .bind(input.risk_profile.as_str())
    .bind(input.objective.as_str())
    .bind(input.horizon_months)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

/// Soft delete. Returns false when no active client has this id.
pub async fn deactivate_client(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("UPDATE clients SET is_active = false WHERE id = $1 AND is_active = true")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
