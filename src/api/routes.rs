//! API route definitions
//!
//! Organizes endpoints for the solar dashboard:
//! - /api/health - process health
//! - /api/solar/live-panels - pull-mode snapshot (request-driven tick)
//! - /api/solar/stream - push-mode SSE subscription
//! - /api/solar/start, /api/solar/stop - push-mode control
//! - /api/solar/status, /api/solar/sample - replay introspection

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard.
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/solar/live-panels", get(handlers::get_live_panels))
        .route("/solar/stream", get(handlers::get_stream))
        .route("/solar/start", post(handlers::post_start))
        .route("/solar/stop", post(handlers::post_stop))
        .route("/solar/status", get(handlers::get_status))
        .route("/solar/sample", get(handlers::get_sample))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    fn create_test_state() -> DashboardState {
        DashboardState::new(SimState::new(30).into_shared(), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_api_routes_health() {
        let app = api_routes(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_routes_status() {
        let app = api_routes(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/solar/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_routes_live_panels() {
        let app = api_routes(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/solar/live-panels")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_routes_sample_without_data_is_404() {
        let app = api_routes(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/solar/sample")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
