//! Shared data structures for the solar fleet telemetry feed
//!
//! This module defines the core types crossing component boundaries:
//! - `PanelReading` / `AggregateMetrics` (fleet simulator outputs)
//! - `PlaybackRecord` / `PlaybackFrame` (recorded-data replay)
//! - `StreamEvent` (push-mode wire events)

mod events;
mod panel;
mod playback;

pub use events::*;
pub use panel::*;
pub use playback::*;
