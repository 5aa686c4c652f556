//! REST API module using Axum
//!
//! Provides HTTP endpoints for the solar telemetry dashboard:
//! - pull-mode snapshots at /api/solar/live-panels
//! - push-mode SSE stream at /api/solar/stream with start/stop control

pub mod handlers;
mod routes;

pub use handlers::DashboardState;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the CORS layer.
///
/// The dashboard is typically served from a separate origin, so the
/// default allows any origin. Set
/// `SOLAR_TWIN_CORS_ORIGINS` to a comma-separated list to restrict.
fn build_cors_layer() -> CorsLayer {
    match std::env::var("SOLAR_TWIN_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::CACHE_CONTROL])
        }
        Err(_) => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::CACHE_CONTROL]),
    }
}

/// Create the complete application router.
pub fn create_app(state: DashboardState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
