pub mod asset_repo;
pub mod audit_repo;
pub mod client_repo;
pub mod macro_repo;
pub mod portfolio_repo;
pub mod store;

pub use store::PgStore;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub async fn init_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}

/// Apply the embedded schema migrations.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
