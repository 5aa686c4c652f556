//! System state endpoints: health and simulation run status.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::DashboardState;

// ============================================================================
// Health Endpoint
// ============================================================================

/// Process health summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Simulated fleet size
    pub panel_count: usize,
    /// Loaded playback records
    pub data_points: usize,
    pub data_loaded: bool,
    pub uptime_secs: u64,
    /// Pull-mode snapshots served since process start
    pub polls_served: u64,
    /// Push-mode frames broadcast since process start
    pub ticks_broadcast: u64,
}

/// GET /api/health
pub async fn get_health(State(state): State<DashboardState>) -> Json<HealthResponse> {
    let sim = state.sim.read().await;
    let panel_count = if sim.fleet.is_empty() {
        sim.panel_count
    } else {
        sim.fleet.len()
    };
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
        panel_count,
        data_points: sim.playback.len(),
        data_loaded: !sim.playback.is_empty(),
        uptime_secs: sim.uptime_secs(),
        polls_served: sim.polls_served,
        ticks_broadcast: sim.ticks_broadcast,
    })
}

// ============================================================================
// Simulation Status Endpoint
// ============================================================================

/// Push-mode run state and replay progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub is_running: bool,
    /// 0-based cursor: index of the next record to broadcast
    pub current_index: usize,
    pub total_data_points: usize,
    pub has_data: bool,
}

/// GET /api/solar/status
pub async fn get_status(State(state): State<DashboardState>) -> Json<StatusResponse> {
    let sim = state.sim.read().await;
    Json(StatusResponse {
        is_running: sim.is_running,
        current_index: sim.playback.cursor(),
        total_data_points: sim.playback.len(),
        has_data: !sim.playback.is_empty(),
    })
}
