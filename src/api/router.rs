use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    let api = Router::new()
        // Recommendations
        .route("/api/recommendations", post(handlers::recommendations::create))
        .route("/api/recommendations/:id", get(handlers::recommendations::detail))
        .route("/api/recommendations/:id/approval", patch(handlers::recommendations::approve))
        .route("/api/recommendations/:id/simulation", get(handlers::recommendations::simulation))
        .route(
            "/api/recommendations/:id/diversification",
            get(handlers::recommendations::diversification),
        )
        // Clients
        .route("/api/clients", post(handlers::clients::create))
        .route(
            "/api/clients/:id",
            put(handlers::clients::update).delete(handlers::clients::delete),
        )
        .route("/api/clients/:id/profile", get(handlers::clients::profile))
        .route("/api/clients/:id/recommendations", get(handlers::clients::recommendations))
        // Catalog
        .route("/api/assets", get(handlers::assets::list).post(handlers::assets::create))
        .route(
            "/api/assets/:id",
            put(handlers::assets::update).delete(handlers::assets::delete),
        )
        // Macro context
        .route("/api/macro/snapshot", get(handlers::macro_data::snapshot))
        .route("/api/macro/refresh", post(handlers::macro_data::refresh))
        .route("/api/macro/indicators/:code", put(handlers::macro_data::update_indicator));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
