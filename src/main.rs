use std::sync::Arc;

use portfolio_advisor::api::create_router;
use portfolio_advisor::bcb::BcbClient;
use portfolio_advisor::config::AppConfig;
use portfolio_advisor::db::{self, PgStore};
use portfolio_advisor::metrics::init_metrics;
use portfolio_advisor::services::macro_refresher::run_macro_refresher;
use portfolio_advisor::services::{RecommendationService, RegistryService};
use portfolio_advisor::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    let metrics_handle = init_metrics()?;

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url).await?;
    db::migrate(&pool).await?;
    tracing::info!("Database connected, migrations applied");

    let store = Arc::new(PgStore::new(pool.clone()));
    let service = RecommendationService::with_backend(store.clone(), config.macro_timeout());
    let registry = RegistryService::with_backend(store);

    let bcb = BcbClient::new(config.bcb_base_url.clone(), config.bcb_timeout())?;

    if config.macro_refresh_enabled {
        let refresher_pool = pool.clone();
        let refresher_client = bcb.clone();
        let interval_secs = config.macro_refresh_interval().as_secs();
        tokio::spawn(async move {
            run_macro_refresher(refresher_pool, refresher_client, interval_secs).await;
        });
    } else {
        tracing::info!("Macro refresher disabled (MACRO_REFRESH_ENABLED=false)");
    }

    let state = AppState {
        db: Some(pool),
        config,
        service,
        registry,
        metrics_handle,
        bcb: Some(bcb),
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
