use std::env;
use std::time::Duration;

const DEFAULT_BCB_BASE_URL: &str = "https://api.bcb.gov.br/dados/serie/bcdata.sgs";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Macro context
    pub macro_timeout_ms: u64,
    pub bcb_base_url: String,
    pub bcb_timeout_secs: u64,
    pub macro_refresh_enabled: bool,
    pub macro_refresh_interval_secs: u64,

    // Reports
    pub default_simulation_months: i32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            macro_timeout_ms: parse_or("MACRO_TIMEOUT_MS", 2_000),
            bcb_base_url: env::var("BCB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BCB_BASE_URL.into()),
            bcb_timeout_secs: parse_or("BCB_TIMEOUT_SECS", 10),
            macro_refresh_enabled: parse_or("MACRO_REFRESH_ENABLED", false),
            macro_refresh_interval_secs: parse_or("MACRO_REFRESH_INTERVAL_SECS", 3_600),

            default_simulation_months: parse_or("DEFAULT_SIMULATION_MONTHS", 12),
        })
    }

    pub fn macro_timeout(&self) -> Duration {
        Duration::from_millis(self.macro_timeout_ms)
    }

    pub fn bcb_timeout(&self) -> Duration {
        Duration::from_secs(self.bcb_timeout_secs)
    }

    pub fn macro_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.macro_refresh_interval_secs.max(1))
    }
}

impl Default for AppConfig {
    /// Settings for running without a database (tests, local experiments).
    fn default() -> Self {
        Self {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 8080,
            macro_timeout_ms: 2_000,
            bcb_base_url: DEFAULT_BCB_BASE_URL.into(),
            bcb_timeout_secs: 10,
            macro_refresh_enabled: false,
            macro_refresh_interval_secs: 3_600,
            default_simulation_months: 12,
        }
    }
}

/// Optional setting: unset or unparsable values fall back to `default`.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
