use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use metrics::{counter, histogram};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::engine::{self, diversification, simulator};
use crate::errors::AppError;
use crate::models::{
    AllocationParams, ApprovalStatus, Asset, AuditEntry, ClientProfile, DiversificationReport,
    MacroSnapshot, Portfolio, ProjectionSeries, RecommendationRequest, MAX_AMOUNT,
};
use crate::ports::{AssetCatalog, ClientProfileResolver, MacroContextProvider, RecommendationStore};

/// Sequences one recommendation run and serves the read/approve operations
/// on stored portfolios.
#[derive(Clone)]
pub struct RecommendationService {
    catalog: Arc<dyn AssetCatalog>,
    macro_provider: Arc<dyn MacroContextProvider>,
    profiles: Arc<dyn ClientProfileResolver>,
    store: Arc<dyn RecommendationStore>,
    macro_timeout: Duration,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<dyn AssetCatalog>,
        macro_provider: Arc<dyn MacroContextProvider>,
        profiles: Arc<dyn ClientProfileResolver>,
        store: Arc<dyn RecommendationStore>,
        macro_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            macro_provider,
            profiles,
            store,
            macro_timeout,
        }
    }

    /// All collaborators served by one backend (e.g. `db::PgStore`).
    pub fn with_backend<B>(backend: Arc<B>, macro_timeout: Duration) -> Self
    where
        B: AssetCatalog + MacroContextProvider + ClientProfileResolver + RecommendationStore + 'static,
    {
        Self::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend,
            macro_timeout,
        )
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Generate, score and persist a new portfolio for the request.
    ///
    /// Every failed run leaves a failure entry in the audit log, written
    /// outside the (rolled back) recommendation transaction.
    pub async fn generate(&self, request: RecommendationRequest) -> Result<Portfolio, AppError> {
        let started = Instant::now();
        tracing::info!(
            client_id = %request.client_id,
            amount = %request.amount,
            consider_macro = request.consider_macro,
            "Recommendation run started"
        );

        let result = self.run(&request, started).await;
        histogram!("recommendation_latency_seconds").record(started.elapsed().as_secs_f64());

        match result {
            Ok(portfolio) => {
                counter!("recommendations_generated_total").increment(1);
                tracing::info!(
                    client_id = %portfolio.client_id,
                    portfolio_id = %portfolio.id,
                    items = portfolio.items.len(),
                    expected_yield = %portfolio.expected_yield,
                    elapsed_ms = elapsed_ms(started),
                    "Recommendation generated"
                );
                Ok(portfolio)
            }
            Err(e) => {
                counter!("recommendations_failed_total").increment(1);
                tracing::warn!(
                    client_id = %request.client_id,
                    error = %e,
                    elapsed_ms = elapsed_ms(started),
                    "Recommendation run failed"
                );

                let entry = AuditEntry::failure(&request, elapsed_ms(started), &e.to_string());
                if let Err(log_err) = self.store.append_audit_log(&entry).await {
                    tracing::error!(
                        client_id = %request.client_id,
                        error = %log_err,
                        "Failed to write failure audit entry"
                    );
                }

                Err(e)
            }
        }
    }

    async fn run(&self, request: &RecommendationRequest, started: Instant) -> Result<Portfolio, AppError> {
        if request.amount <= Decimal::ZERO {
            return Err(AppError::InvalidArgument(format!(
                "amount must be positive, got {}",
                request.amount
            )));
        }
        if request.amount > MAX_AMOUNT {
            return Err(AppError::InvalidArgument(format!(
                "amount must not exceed {MAX_AMOUNT}, got {}",
                request.amount
            )));
        }

        let profile = self.resolve_profile(request.client_id).await?;

        let params = AllocationParams {
            amount: request.amount,
            objective: request.objective.unwrap_or(profile.objective),
            horizon_months: request.horizon_months.unwrap_or(profile.horizon_months),
            consider_macro: request.consider_macro,
        };
        if params.horizon_months <= 0 {
            return Err(AppError::InvalidArgument(format!(
                "horizon_months must be positive, got {}",
                params.horizon_months
            )));
        }

        // Independent reads: eligible catalog and macro context.
        let (candidates, snapshot) = tokio::join!(
            self.catalog
                .list_eligible(profile.risk_profile, params.amount, &request.asset_ids),
            self.fetch_macro(params.consider_macro),
        );

        let candidates = candidates.map_err(|e| {
            AppError::UpstreamUnavailable(format!("asset catalog unavailable: {e:#}"))
        })?;
        if candidates.is_empty() {
            return Err(AppError::InvalidArgument(format!(
                "no eligible assets for a {} profile investing {}",
                profile.risk_profile, params.amount
            )));
        }

        let portfolio = engine::build_portfolio(&profile, &candidates, &params, snapshot.as_ref(), Utc::now());
        if portfolio.items.is_empty() {
            return Err(AppError::InvalidArgument(
                "no eligible asset matched any allocation class".into(),
            ));
        }

        let audit = AuditEntry::success(request, &portfolio, elapsed_ms(started));
        self.store
            .save_recommendation(&portfolio, &audit)
            .await
            .map_err(|e| {
                tracing::error!(
                    client_id = %portfolio.client_id,
                    portfolio_id = %portfolio.id,
                    error = %e,
                    "Persisting recommendation failed, transaction rolled back"
                );
                AppError::Persistence(format!("{e:#}"))
            })?;

        Ok(portfolio)
    }

    async fn resolve_profile(&self, client_id: Uuid) -> Result<ClientProfile, AppError> {
        match self.profiles.get_profile(client_id).await {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => Err(AppError::NotFound(format!("client {client_id}"))),
            Err(e) => Err(AppError::UpstreamUnavailable(format!(
                "client profile unavailable: {e:#}"
            ))),
        }
    }

    /// Macro context for a run. Failures and timeouts degrade to `None`.
    async fn fetch_macro(&self, wanted: bool) -> Option<MacroSnapshot> {
        if !wanted {
            return None;
        }

        match tokio::time::timeout(self.macro_timeout, self.macro_provider.snapshot()).await {
            Ok(Ok(snapshot)) => Some(snapshot),
            Ok(Err(e)) => {
                counter!("macro_fallbacks_total").increment(1);
                tracing::warn!(error = %e, "Macro context unavailable, skipping macro adjustment");
                None
            }
            Err(_) => {
                counter!("macro_fallbacks_total").increment(1);
                tracing::warn!(
                    timeout_ms = self.macro_timeout.as_millis() as u64,
                    "Macro context timed out, skipping macro adjustment"
                );
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Stored portfolios
    // -----------------------------------------------------------------------

    pub async fn get(&self, id: Uuid) -> Result<Portfolio, AppError> {
        self.store
            .get_portfolio(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("portfolio {id}")))
    }

    /// Record an approval decision. Later decisions overwrite earlier ones.
    pub async fn approve(&self, id: Uuid, approved: bool) -> Result<Portfolio, AppError> {
        let status = ApprovalStatus::from_decision(approved);
        let portfolio = self
            .store
            .set_approval(id, status, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("portfolio {id}")))?;

        counter!("approvals_total", "decision" => status.as_str()).increment(1);
        tracing::info!(portfolio_id = %id, decision = %status, "Approval recorded");

        Ok(portfolio)
    }

    pub async fn simulate(&self, id: Uuid, months: i32) -> Result<ProjectionSeries, AppError> {
        simulator::check_months(months)?;
        let portfolio = self.get(id).await?;
        simulator::simulate(&portfolio, months)
    }

    pub async fn diversification(&self, id: Uuid) -> Result<DiversificationReport, AppError> {
        let portfolio = self.get(id).await?;
        Ok(diversification::analyze(&portfolio))
    }

    pub async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<Portfolio>, AppError> {
        self.resolve_profile(client_id).await?;
        Ok(self.store.list_for_client(client_id).await?)
    }

    // -----------------------------------------------------------------------
    // Reference data
    // -----------------------------------------------------------------------

    pub async fn profile(&self, client_id: Uuid) -> Result<ClientProfile, AppError> {
        self.resolve_profile(client_id).await
    }

    pub async fn assets(&self) -> Result<Vec<Asset>, AppError> {
        self.catalog
            .list_active()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("asset catalog unavailable: {e:#}")))
    }

    pub async fn macro_snapshot(&self) -> Result<MacroSnapshot, AppError> {
        match tokio::time::timeout(self.macro_timeout, self.macro_provider.snapshot()).await {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(e)) => Err(AppError::UpstreamUnavailable(format!("macro context unavailable: {e:#}"))),
            Err(_) => Err(AppError::UpstreamUnavailable("macro context timed out".into())),
        }
    }
}

fn elapsed_ms(started: Instant) -> i64 {
    started.elapsed().as_millis() as i64
}
