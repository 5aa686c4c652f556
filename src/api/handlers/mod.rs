//! API route handlers
//!
//! Request handling logic for all endpoints:
//! - Health and simulation run status
//! - Pull-mode live panel snapshots
//! - Push-mode SSE subscription and start/stop control

mod panels;
mod status;
mod streaming;

pub use panels::*;
pub use status::*;
pub use streaming::*;

use std::time::Duration;

use serde::Serialize;

use crate::sim::SharedSim;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers.
#[derive(Clone)]
pub struct DashboardState {
    /// The owning simulation context
    pub sim: SharedSim,
    /// Push-mode broadcast cadence
    pub tick_interval: Duration,
}

impl DashboardState {
    pub fn new(sim: SharedSim, tick_interval: Duration) -> Self {
        Self { sim, tick_interval }
    }
}

/// Flat error body: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimState;
    use axum::extract::State;

    fn create_test_state() -> DashboardState {
        DashboardState::new(SimState::new(30).into_shared(), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_health_reports_configured_panel_count() {
        let state = create_test_state();
        let response = get_health(State(state)).await;
        assert_eq!(response.status, "OK");
        assert_eq!(response.panel_count, 30);
        assert!(!response.data_loaded);
        assert_eq!(response.polls_served, 0);
        assert_eq!(response.ticks_broadcast, 0);
    }

    #[tokio::test]
    async fn test_status_before_any_activity() {
        let state = create_test_state();
        let response = get_status(State(state)).await;
        assert!(!response.is_running);
        assert_eq!(response.current_index, 0);
        assert_eq!(response.total_data_points, 0);
        assert!(!response.has_data);
    }

    #[tokio::test]
    async fn test_live_panels_initializes_and_ticks() {
        let state = create_test_state();
        let response = get_live_panels(State(state.clone())).await;
        assert_eq!(response.panels.len(), 30);
        assert_eq!(response.metrics.panel_counts.total, 30);
        assert!(response.current_playback_record.is_none());
        assert_eq!(state.sim.read().await.polls_served, 1);
    }
}
