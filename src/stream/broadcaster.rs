//! Push-mode state machine and broadcast timer.
//!
//! STOPPED -> RUNNING -> STOPPED. While running, a repeating timer fetches
//! the next playback frame once per cadence, restamps it with the current
//! wall clock, and fans it out to every registered subscriber. Start and
//! stop are idempotent in both directions - a double start or double stop
//! reports current state instead of erroring.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::sim::SharedSim;
use crate::types::StreamEvent;

/// Distinguished error for starting against an empty playback source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartError {
    #[error("No data loaded. Please ensure the solar data CSV file is in the project directory.")]
    NoData,
}

/// Outcome of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Transitioned STOPPED -> RUNNING and armed the timer.
    Started,
    /// Already running; no-op.
    AlreadyRunning,
}

/// Outcome of a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Transitioned RUNNING -> STOPPED and disarmed the timer.
    Stopped,
    /// Already stopped; no-op.
    NotRunning,
}

/// Transition to RUNNING and arm the broadcast timer.
///
/// Requires a non-empty playback source. Idempotent: a second start while
/// running changes nothing and never double-arms the timer.
pub async fn start(sim: &SharedSim, tick_interval: Duration) -> Result<StartOutcome, StartError> {
    let cancel = {
        let mut state = sim.write().await;
        if state.playback.is_empty() {
            return Err(StartError::NoData);
        }
        if state.is_running {
            return Ok(StartOutcome::AlreadyRunning);
        }
        let cancel = CancellationToken::new();
        state.is_running = true;
        state.timer = Some(cancel.clone());
        cancel
    };

    spawn_timer(SharedSim::clone(sim), tick_interval, cancel);
    info!("Starting solar panel simulation");
    Ok(StartOutcome::Started)
}

/// Transition to STOPPED: disarm the timer and notify subscribers.
///
/// Idempotent: stopping while already stopped is a no-op.
pub async fn stop(sim: &SharedSim) -> StopOutcome {
    let mut state = sim.write().await;
    if !state.is_running {
        return StopOutcome::NotRunning;
    }
    state.is_running = false;
    if let Some(cancel) = state.timer.take() {
        cancel.cancel();
    }
    state.registry.broadcast(&StreamEvent::Stopped {
        message: "Simulation stopped".to_string(),
    });
    info!("Solar panel simulation stopped");
    StopOutcome::Stopped
}

/// Disarm any live timer before process exit.
pub async fn shutdown(sim: &SharedSim) {
    if stop(sim).await == StopOutcome::Stopped {
        info!("Broadcast timer disarmed for shutdown");
    }
}

/// The repeating broadcast task. One playback frame per fire; the first
/// fire happens one full interval after start, not immediately.
fn spawn_timer(sim: SharedSim, tick_interval: Duration, cancel: CancellationToken) {
    tokio::spawn(async move {
        debug!(cadence_ms = tick_interval.as_millis() as u64, "[Broadcast] Timer armed");
        let start = tokio::time::Instant::now() + tick_interval;
        let mut interval = tokio::time::interval_at(start, tick_interval);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("[Broadcast] Timer disarmed");
                    return;
                }
                _ = interval.tick() => {
                    let mut state = sim.write().await;
                    if !state.is_running {
                        return;
                    }
                    if let Some(mut frame) = state.playback.next_frame() {
                        // Recorded timestamp is replaced with the current
                        // wall clock so the stream reads as live telemetry.
                        frame.record.timestamp = Utc::now().to_rfc3339();
                        state.ticks_broadcast += 1;
                        state.registry.broadcast(&StreamEvent::Data { frame });
                    }
                }
            }
        }
    });
}
