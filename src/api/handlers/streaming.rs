//! Push-mode endpoints: SSE subscription, start/stop control, sample data.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use tracing::info;

use crate::stream::broadcaster;
use crate::stream::{StartError, StartOutcome, StopOutcome};
use crate::types::{PlaybackRecord, StreamEvent};

use super::{DashboardState, ErrorReply};

/// Start/stop control reply: `{ "message": "...", "isRunning": bool }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReply {
    pub message: &'static str,
    pub is_running: bool,
}

// ============================================================================
// SSE Subscription
// ============================================================================

/// GET /api/solar/stream
///
/// Long-lived `text/event-stream` response. The first event acknowledges
/// the connection; subsequent events are broadcast data frames or the stop
/// notice. Subscription is independent of run state - a client may join
/// while stopped and will simply wait for the next start.
pub async fn get_stream(
    State(state): State<DashboardState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (id, tx, rx) = {
        let mut sim = state.sim.write().await;
        let (id, tx, rx) = sim.registry.register();
        let connected = StreamEvent::Connected {
            message: "Connected to solar panel stream".to_string(),
            total_data_points: sim.playback.len(),
            is_running: sim.is_running,
        };
        // The channel is freshly created, so this send cannot fail.
        let _ = tx.try_send(connected);
        info!(subscriber = id, "New stream client connected");
        (id, tx, rx)
    };

    // Reap the registry entry the moment the client transport closes,
    // regardless of run state.
    let sim = Arc::clone(&state.sim);
    tokio::spawn(async move {
        tx.closed().await;
        let mut sim = sim.write().await;
        if sim.registry.remove(id) {
            info!(subscriber = id, "Stream client disconnected");
        }
    });

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (event, rx))
    })
    .map(|event| Event::default().json_data(&event));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// ============================================================================
// Start / Stop Control
// ============================================================================

/// POST /api/solar/start
pub async fn post_start(State(state): State<DashboardState>) -> Response {
    match broadcaster::start(&state.sim, state.tick_interval).await {
        Ok(StartOutcome::Started) => Json(RunReply {
            message: "Simulation started",
            is_running: true,
        })
        .into_response(),
        Ok(StartOutcome::AlreadyRunning) => Json(RunReply {
            message: "Simulation already running",
            is_running: true,
        })
        .into_response(),
        Err(e @ StartError::NoData) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorReply {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// POST /api/solar/stop
pub async fn post_stop(State(state): State<DashboardState>) -> Json<RunReply> {
    match broadcaster::stop(&state.sim).await {
        StopOutcome::Stopped => Json(RunReply {
            message: "Simulation stopped",
            is_running: false,
        }),
        StopOutcome::NotRunning => Json(RunReply {
            message: "Simulation not running",
            is_running: false,
        }),
    }
}

// ============================================================================
// Sample Data
// ============================================================================

/// Number of records returned by the sample endpoint.
const SAMPLE_SIZE: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleResponse {
    pub sample_data: Vec<PlaybackRecord>,
    pub total_points: usize,
}

/// GET /api/solar/sample - first records of the loaded data set, for
/// client-side smoke testing. 404 when nothing is loaded.
pub async fn get_sample(State(state): State<DashboardState>) -> Response {
    let sim = state.sim.read().await;
    if sim.playback.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorReply {
                error: "No data loaded".to_string(),
            }),
        )
            .into_response();
    }
    Json(SampleResponse {
        sample_data: sim.playback.sample(SAMPLE_SIZE).to_vec(),
        total_points: sim.playback.len(),
    })
    .into_response()
}
