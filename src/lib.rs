pub mod api;
pub mod bcb;
pub mod config;
pub mod db;
pub mod engine;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod services;

use crate::bcb::BcbClient;
use crate::config::AppConfig;
use crate::services::{RecommendationService, RegistryService};

#[derive(Clone)]
pub struct AppState {
    /// `None` when running without a database; DB-only routes answer 503.
    pub db: Option<sqlx::PgPool>,
    pub config: AppConfig,
    pub service: RecommendationService,
    pub registry: RegistryService,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    pub bcb: Option<BcbClient>,
}
