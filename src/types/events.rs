//! Wire events pushed to stream subscribers.

use serde::Serialize;

use super::PlaybackFrame;

/// One event on a subscriber's push channel, serialized as
/// `data: <json>\n\n` on the SSE transport.
///
/// The `type` tag distinguishes the connection acknowledgement, regular
/// data ticks, and the stop notice.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// First event on every new subscription, regardless of run state.
    #[serde(rename_all = "camelCase")]
    Connected {
        message: String,
        total_data_points: usize,
        is_running: bool,
    },
    /// One playback frame per timer fire while the simulation is running.
    /// The frame's timestamp is restamped with the current wall clock.
    Data {
        #[serde(flatten)]
        frame: PlaybackFrame,
    },
    /// Broadcast once when the simulation transitions to stopped.
    Stopped { message: String },
}
