use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::Decimal;
use uuid::Uuid;

use portfolio_advisor::api::create_router;
use portfolio_advisor::config::AppConfig;
use portfolio_advisor::models::{
    ApprovalStatus, Asset, AssetClass, AssetInput, AuditEntry, Client, ClientConflict, ClientInput,
    ClientProfile, IndicatorKind, MacroIndicator, MacroSnapshot, Objective, Portfolio,
    RecommendationRequest, RiskProfile, Trend,
};
use portfolio_advisor::ports::{
    AssetCatalog, AssetRegistry, ClientProfileResolver, ClientRegistry, MacroContextProvider,
    RecommendationStore,
};
use portfolio_advisor::services::{RecommendationService, RegistryService};
use portfolio_advisor::AppState;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Catalog applying the same eligibility rules as the SQL query.
pub struct FakeCatalog {
    pub assets: Vec<Asset>,
    pub fail: bool,
}

#[async_trait]
impl AssetCatalog for FakeCatalog {
    async fn list_eligible(
        &self,
        tier: RiskProfile,
        max_min_investment: Decimal,
        allowlist: &[Uuid],
    ) -> anyhow::Result<Vec<Asset>> {
        if self.fail {
            anyhow::bail!("catalog offline");
        }
        let mut out: Vec<Asset> = self
            .assets
            .iter()
            .filter(|a| tier.accepts(a.risk))
            .filter(|a| a.min_investment <= max_min_investment)
            .filter(|a| allowlist.is_empty() || allowlist.contains(&a.id))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.risk.cmp(&b.risk).then_with(|| b.expected_return.cmp(&a.expected_return)));
        Ok(out)
    }

    async fn list_active(&self) -> anyhow::Result<Vec<Asset>> {
        Ok(self.assets.clone())
    }
}

/// Macro provider returning a fixed snapshot, optionally after a delay.
/// `snapshot: None` makes every call fail.
pub struct FakeMacro {
    pub snapshot: Option<MacroSnapshot>,
    pub delay: Option<Duration>,
}

#[async_trait]
impl MacroContextProvider for FakeMacro {
    async fn snapshot(&self) -> anyhow::Result<MacroSnapshot> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.snapshot
            .clone()
            .ok_or_else(|| anyhow::anyhow!("macro source offline"))
    }
}

#[derive(Default)]
pub struct FakeProfiles {
    pub profiles: HashMap<Uuid, ClientProfile>,
}

#[async_trait]
impl ClientProfileResolver for FakeProfiles {
    async fn get_profile(&self, client_id: Uuid) -> anyhow::Result<Option<ClientProfile>> {
        Ok(self.profiles.get(&client_id).cloned())
    }
}

/// Store keeping everything in memory. With `fail_saves` set, saves fail
/// and leave no trace, like a rolled back transaction.
#[derive(Default)]
pub struct MemoryStore {
    pub portfolios: Mutex<HashMap<Uuid, Portfolio>>,
    pub audit: Mutex<Vec<AuditEntry>>,
    pub fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit.lock().unwrap().clone()
    }

    pub fn portfolio_count(&self) -> usize {
        self.portfolios.lock().unwrap().len()
    }
}

#[async_trait]
impl RecommendationStore for MemoryStore {
    async fn save_recommendation(&self, portfolio: &Portfolio, audit: &AuditEntry) -> anyhow::Result<Uuid> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("commit transaction failed");
        }
        self.portfolios.lock().unwrap().insert(portfolio.id, portfolio.clone());
        self.audit.lock().unwrap().push(audit.clone());
        Ok(portfolio.id)
    }

    async fn append_audit_log(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        self.audit.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn get_portfolio(&self, id: Uuid) -> anyhow::Result<Option<Portfolio>> {
        Ok(self.portfolios.lock().unwrap().get(&id).cloned())
    }

    async fn list_for_client(&self, client_id: Uuid) -> anyhow::Result<Vec<Portfolio>> {
        let mut out: Vec<Portfolio> = self
            .portfolios
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.client_id == client_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(out)
    }

    async fn set_approval(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Portfolio>> {
        let mut portfolios = self.portfolios.lock().unwrap();
        Ok(portfolios.get_mut(&id).map(|p| {
            p.approval = status;
            p.approved_at = Some(at);
            p.clone()
        }))
    }
}

/// Client and asset registrations kept in memory, with soft deletes.
#[derive(Default)]
pub struct MemoryRegistry {
    pub clients: Mutex<Vec<Client>>,
    pub assets: Mutex<Vec<(Asset, bool)>>,
}

#[async_trait]
impl ClientRegistry for MemoryRegistry {
    async fn find_conflict(
        &self,
        tax_id: &str,
        email: &str,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<Option<ClientConflict>> {
        let clients = self.clients.lock().unwrap();
        let others: Vec<&Client> = clients
            .iter()
            .filter(|c| c.is_active && Some(c.id) != exclude)
            .collect();
        if others.iter().any(|c| c.tax_id == tax_id) {
            return Ok(Some(ClientConflict::TaxId));
        }
        if others.iter().any(|c| c.email == email) {
            return Ok(Some(ClientConflict::Email));
        }
        Ok(None)
    }

    async fn create_client(&self, input: &ClientInput) -> anyhow::Result<Client> {
        let client = client_from_input(Uuid::new_v4(), input);
        self.clients.lock().unwrap().push(client.clone());
        Ok(client)
    }

    async fn update_client(&self, id: Uuid, input: &ClientInput) -> anyhow::Result<Option<Client>> {
        let mut clients = self.clients.lock().unwrap();
        Ok(clients.iter_mut().find(|c| c.id == id && c.is_active).map(|c| {
            let created_at = c.created_at;
            *c = client_from_input(id, input);
            c.created_at = created_at;
            c.clone()
        }))
    }

    async fn deactivate_client(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut clients = self.clients.lock().unwrap();
        Ok(match clients.iter_mut().find(|c| c.id == id && c.is_active) {
            Some(client) => {
                client.is_active = false;
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl AssetRegistry for MemoryRegistry {
    async fn code_in_use(&self, code: &str, exclude: Option<Uuid>) -> anyhow::Result<bool> {
        Ok(self
            .assets
            .lock()
            .unwrap()
            .iter()
            .any(|(a, active)| *active && a.code == code && Some(a.id) != exclude))
    }

    async fn create_asset(&self, input: &AssetInput) -> anyhow::Result<Asset> {
        let asset = asset_from_input(Uuid::new_v4(), input);
        self.assets.lock().unwrap().push((asset.clone(), true));
        Ok(asset)
    }

    async fn update_asset(&self, id: Uuid, input: &AssetInput) -> anyhow::Result<Option<Asset>> {
        let mut assets = self.assets.lock().unwrap();
        Ok(assets.iter_mut().find(|(a, active)| a.id == id && *active).map(|(a, _)| {
            *a = asset_from_input(id, input);
            a.clone()
        }))
    }

    async fn deactivate_asset(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut assets = self.assets.lock().unwrap();
        Ok(match assets.iter_mut().find(|(a, active)| a.id == id && *active) {
            Some((_, active)) => {
                *active = false;
                true
            }
            None => false,
        })
    }
}

fn client_from_input(id: Uuid, input: &ClientInput) -> Client {
    Client {
        id,
        name: input.name.clone(),
        email: input.email.clone(),
        tax_id: input.tax_id.clone(),
        birth_date: input.birth_date,
        monthly_income: input.monthly_income,
        available_capital: input.available_capital,
        risk_profile: input.risk_profile.as_str().to_string(),
        objective: input.objective.as_str().to_string(),
        horizon_months: input.horizon_months,
        is_active: true,
        created_at: Utc::now(),
    }
}

fn asset_from_input(id: Uuid, input: &AssetInput) -> Asset {
    Asset {
        id,
        code: input.code.clone(),
        name: input.name.clone(),
        class: input.class,
        risk: input.risk,
        expected_return: input.expected_return,
        liquidity_days: input.liquidity_days,
        min_investment: input.min_investment,
        management_fee: input.management_fee,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[allow(dead_code)]
pub fn asset(
    code: &str,
    class: AssetClass,
    risk: RiskProfile,
    expected_return: i64,
    liquidity_days: i32,
    fee_bps: i64,
) -> Asset {
    Asset {
        id: Uuid::new_v4(),
        code: code.into(),
        name: format!("{code} asset"),
        class,
        risk,
        expected_return: Decimal::from(expected_return),
        liquidity_days,
        min_investment: Decimal::from(100),
        management_fee: Decimal::new(fee_bps, 2),
    }
}

/// Two fixed income assets (8% / 6%) and one conservative fund (5%, 0.5% fee).
#[allow(dead_code)]
pub fn conservative_catalog() -> Vec<Asset> {
    vec![
        asset("CDB-A", AssetClass::FixedIncome, RiskProfile::Conservative, 8, 10, 0),
        asset("CDB-B", AssetClass::FixedIncome, RiskProfile::Conservative, 6, 20, 0),
        asset("FUND-C", AssetClass::Fund, RiskProfile::Conservative, 5, 30, 50),
    ]
}

#[allow(dead_code)]
pub fn mixed_catalog() -> Vec<Asset> {
    let mut assets = conservative_catalog();
    assets.extend([
        asset("EQ-1", AssetClass::Equity, RiskProfile::Moderate, 14, 2, 0),
        asset("EQ-2", AssetClass::Equity, RiskProfile::Moderate, 12, 2, 0),
        asset("EQ-3", AssetClass::Equity, RiskProfile::Aggressive, 22, 2, 0),
        asset("FUND-M", AssetClass::Fund, RiskProfile::Moderate, 10, 30, 150),
    ]);
    assets
}

#[allow(dead_code)]
pub fn profile(client_id: Uuid, tier: RiskProfile) -> ClientProfile {
    ClientProfile {
        client_id,
        name: "Test Client".into(),
        risk_profile: tier,
        objective: Objective::Retirement,
        horizon_months: 120,
        available_capital: Decimal::from(50_000),
        monthly_income: Decimal::from(10_000),
        age: 45,
        investment_capacity: Decimal::from(51_000),
    }
}

#[allow(dead_code)]
pub fn request(client_id: Uuid, amount: i64) -> RecommendationRequest {
    RecommendationRequest {
        client_id,
        amount: Decimal::from(amount),
        objective: None,
        horizon_months: None,
        consider_macro: false,
        asset_ids: vec![],
    }
}

/// Policy rate 13% with falling indicators: a cautious, high-rate scenario.
#[allow(dead_code)]
pub fn cautious_snapshot() -> MacroSnapshot {
    let indicator = |kind, value: i64, trend| MacroIndicator {
        kind,
        value: Decimal::from(value),
        previous_value: None,
        trend,
        updated_at: Utc::now(),
    };
    MacroSnapshot::new(
        vec![
            indicator(IndicatorKind::PolicyRate, 13, Trend::Up),
            indicator(IndicatorKind::Inflation, 5, Trend::Down),
            indicator(IndicatorKind::EquityIndexDelta, -2, Trend::Down),
        ],
        Utc::now(),
    )
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub service: RecommendationService,
    pub registry: RegistryService,
    pub store: Arc<MemoryStore>,
    pub registrations: Arc<MemoryRegistry>,
    pub client_id: Uuid,
}

pub struct HarnessBuilder {
    tier: RiskProfile,
    catalog: Vec<Asset>,
    catalog_fails: bool,
    snapshot: Option<MacroSnapshot>,
    macro_delay: Option<Duration>,
    macro_timeout: Duration,
}

#[allow(dead_code)]
impl HarnessBuilder {
    pub fn new(tier: RiskProfile) -> Self {
        Self {
            tier,
            catalog: conservative_catalog(),
            catalog_fails: false,
            snapshot: None,
            macro_delay: None,
            macro_timeout: Duration::from_millis(500),
        }
    }

    pub fn catalog(mut self, assets: Vec<Asset>) -> Self {
        self.catalog = assets;
        self
    }

    pub fn failing_catalog(mut self) -> Self {
        self.catalog_fails = true;
        self
    }

    pub fn snapshot(mut self, snapshot: MacroSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn slow_macro(mut self, delay: Duration, timeout: Duration) -> Self {
        self.macro_delay = Some(delay);
        self.macro_timeout = timeout;
        self
    }

    pub fn build(self) -> Harness {
        let client_id = Uuid::new_v4();
        let store = Arc::new(MemoryStore::default());

        let mut profiles = FakeProfiles::default();
        profiles.profiles.insert(client_id, profile(client_id, self.tier));

        let service = RecommendationService::new(
            Arc::new(FakeCatalog {
                assets: self.catalog,
                fail: self.catalog_fails,
            }),
            Arc::new(FakeMacro {
                snapshot: self.snapshot,
                delay: self.macro_delay,
            }),
            Arc::new(profiles),
            store.clone(),
            self.macro_timeout,
        );

        let registrations = Arc::new(MemoryRegistry::default());
        let registry = RegistryService::with_backend(registrations.clone());

        Harness {
            service,
            registry,
            store,
            registrations,
            client_id,
        }
    }
}

/// Router over an in-memory harness, without database or central bank client.
#[allow(dead_code)]
pub fn build_test_app(harness: &Harness) -> axum::Router {
    let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

    let state = AppState {
        db: None,
        config: AppConfig::default(),
        service: harness.service.clone(),
        registry: harness.registry.clone(),
        metrics_handle,
        bcb: None,
    };

    create_router(state)
}
