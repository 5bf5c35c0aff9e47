use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{asset_repo, audit_repo, client_repo, macro_repo, portfolio_repo};
use crate::models::{
    ApprovalStatus, Asset, AssetInput, AuditEntry, Client, ClientConflict, ClientInput, ClientProfile,
    MacroSnapshot, Portfolio, RiskProfile,
};
use crate::ports::{
    AssetCatalog, AssetRegistry, ClientProfileResolver, ClientRegistry, MacroContextProvider,
    RecommendationStore,
};

/// PostgreSQL-backed implementation of every collaborator the
/// recommendation service needs.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AssetCatalog for PgStore {
    async fn list_eligible(
        &self,
        tier: RiskProfile,
        max_min_investment: Decimal,
        allowlist: &[Uuid],
    ) -> anyhow::Result<Vec<Asset>> {
        asset_repo::list_eligible(&self.pool, tier, max_min_investment, allowlist).await
    }

    async fn list_active(&self) -> anyhow::Result<Vec<Asset>> {
        asset_repo::list_active(&self.pool).await
    }
}

#[async_trait]
impl MacroContextProvider for PgStore {
    async fn snapshot(&self) -> anyhow::Result<MacroSnapshot> {
        let rows = macro_repo::list_active(&self.pool).await?;

        let mut indicators = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(indicator) = row.into_indicator()? {
                indicators.push(indicator);
            }
        }

        Ok(MacroSnapshot::new(indicators, Utc::now()))
    }
}

#[async_trait]
impl ClientProfileResolver for PgStore {
    async fn get_profile(&self, client_id: Uuid) -> anyhow::Result<Option<ClientProfile>> {
        let Some(client) = client_repo::get_active_client(&self.pool, client_id).await? else {
            return Ok(None);
        };

        let today = Utc::now().date_naive();
        Ok(Some(ClientProfile::from_client(&client, today)?))
    }
}

#[async_trait]
impl RecommendationStore for PgStore {
    async fn save_recommendation(&self, portfolio: &Portfolio, audit: &AuditEntry) -> anyhow::Result<Uuid> {
        portfolio_repo::insert_with_items(&self.pool, portfolio, audit).await
    }

    async fn append_audit_log(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        audit_repo::insert_log(&self.pool, entry).await
    }

    async fn get_portfolio(&self, id: Uuid) -> anyhow::Result<Option<Portfolio>> {
        portfolio_repo::get_portfolio(&self.pool, id).await
    }

    async fn list_for_client(&self, client_id: Uuid) -> anyhow::Result<Vec<Portfolio>> {
        portfolio_repo::list_for_client(&self.pool, client_id).await
    }

    async fn set_approval(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Portfolio>> {
        portfolio_repo::set_approval(&self.pool, id, status, at).await
    }
}

#[async_trait]
impl ClientRegistry for PgStore {
    async fn find_conflict(
        &self,
        tax_id: &str,
        email: &str,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<Option<ClientConflict>> {
        client_repo::find_conflict(&self.pool, tax_id, email, exclude).await
    }

    async fn create_client(&self, input: &ClientInput) -> anyhow::Result<Client> {
        client_repo::insert_client(&self.pool, input).await
    }

    async fn update_client(&self, id: Uuid, input: &ClientInput) -> anyhow::Result<Option<Client>> {
        client_repo::update_client(&self.pool, id, input).await
    }

    async fn deactivate_client(&self, id: Uuid) -> anyhow::Result<bool> {
        client_repo::deactivate_client(&self.pool, id).await
    }
}

#[async_trait]
impl AssetRegistry for PgStore {
    async fn code_in_use(&self, code: &str, exclude: Option<Uuid>) -> anyhow::Result<bool> {
        asset_repo::code_in_use(&self.pool, code, exclude).await
    }

    async fn create_asset(&self, input: &AssetInput) -> anyhow::Result<Asset> {
        asset_repo::insert_asset(&self.pool, input).await
    }

    async fn update_asset(&self, id: Uuid, input: &AssetInput) -> anyhow::Result<Option<Asset>> {
        asset_repo::update_asset(&self.pool, id, input).await
    }

    async fn deactivate_asset(&self, id: Uuid) -> anyhow::Result<bool> {
        asset_repo::deactivate_asset(&self.pool, id).await
    }
}
