//! Collaborator interfaces consumed by the recommendation service.
//!
//! `db::PgStore` implements all of them against PostgreSQL; tests plug in
//! in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    ApprovalStatus, Asset, AssetInput, AuditEntry, Client, ClientConflict, ClientInput, ClientProfile,
    MacroSnapshot, Portfolio, RiskProfile,
};

#[async_trait]
pub trait AssetCatalog: Send + Sync {
    /// Active assets a client of `tier` may hold, with a minimum investment
    /// not above `max_min_investment`. A non-empty `allowlist` restricts the
    /// result to those ids. Ordered by risk ascending, then return descending.
    async fn list_eligible(
        &self,
        tier: RiskProfile,
        max_min_investment: Decimal,
        allowlist: &[Uuid],
    ) -> anyhow::Result<Vec<Asset>>;

    async fn list_active(&self) -> anyhow::Result<Vec<Asset>>;
}

#[async_trait]
pub trait MacroContextProvider: Send + Sync {
    async fn snapshot(&self) -> anyhow::Result<MacroSnapshot>;
}

#[async_trait]
pub trait ClientProfileResolver: Send + Sync {
    /// `None` for unknown or inactive clients.
    async fn get_profile(&self, client_id: Uuid) -> anyhow::Result<Option<ClientProfile>>;
}

#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Persist the portfolio, its items and the success audit entry atomically.
    async fn save_recommendation(&self, portfolio: &Portfolio, audit: &AuditEntry) -> anyhow::Result<Uuid>;

    /// Write an audit entry on its own, outside any recommendation transaction.
    async fn append_audit_log(&self, entry: &AuditEntry) -> anyhow::Result<()>;

    async fn get_portfolio(&self, id: Uuid) -> anyhow::Result<Option<Portfolio>>;

    /// Newest first.
    async fn list_for_client(&self, client_id: Uuid) -> anyhow::Result<Vec<Portfolio>>;

    async fn set_approval(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Portfolio>>;
}

/// Client registration. Only active clients can be updated or deactivated.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Checks active clients other than `exclude`. Tax id wins over email.
    async fn find_conflict(
        &self,
        tax_id: &str,
        email: &str,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<Option<ClientConflict>>;

    async fn create_client(&self, input: &ClientInput) -> anyhow::Result<Client>;

    async fn update_client(&self, id: Uuid, input: &ClientInput) -> anyhow::Result<Option<Client>>;

    /// `false` when there is no active client with this id.
    async fn deactivate_client(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Catalog maintenance. Only active assets can be updated or deactivated.
#[async_trait]
pub trait AssetRegistry: Send + Sync {
    async fn code_in_use(&self, code: &str, exclude: Option<Uuid>) -> anyhow::Result<bool>;

    async fn create_asset(&self, input: &AssetInput) -> anyhow::Result<Asset>;

    async fn update_asset(&self, id: Uuid, input: &AssetInput) -> anyhow::Result<Option<Asset>>;

    async fn deactivate_asset(&self, id: Uuid) -> anyhow::Result<bool>;
}
