//! Pull-mode delivery: one request = one simulation step.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sim::summarize;
use crate::types::{AggregateMetrics, PanelReading, PlaybackFrame};

use super::DashboardState;

/// Pull-mode snapshot: the whole fleet, the derived metrics, and the
/// current playback record (null when no data is loaded).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePanelsResponse {
    pub panels: Vec<PanelReading>,
    pub metrics: AggregateMetrics,
    pub current_playback_record: Option<PlaybackFrame>,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/solar/live-panels
///
/// Each call is a fresh simulation step - the request is the clock. Tick
/// application and the snapshot read run under one write lock, so callers
/// never observe a partial update.
pub async fn get_live_panels(State(state): State<DashboardState>) -> Json<LivePanelsResponse> {
    let mut sim = state.sim.write().await;
    sim.ensure_fleet();
    sim.tick();
    sim.polls_served += 1;

    let metrics = summarize(&sim.fleet);
    let current_playback_record = sim.playback.next_frame();

    Json(LivePanelsResponse {
        panels: sim.fleet.snapshot(),
        metrics,
        current_playback_record,
        timestamp: Utc::now(),
    })
}
