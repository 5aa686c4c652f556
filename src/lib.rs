//! Solar Twin: simulated telemetry feed for a solar panel fleet
//!
//! Ephemeral, process-lifetime simulation exposed over HTTP/SSE.
//!
//! ## Architecture
//!
//! - **Fleet simulator**: in-memory panel readings advanced by a
//!   stateless-random tick rule with fault injection
//! - **Aggregator**: fleet-wide summary metrics, derived on demand
//! - **Playback source**: recorded solar data replayed through a wrapping
//!   cursor
//! - **Delivery**: pull mode (one request = one tick) and push mode (a
//!   fixed-cadence timer broadcasting to SSE subscribers)

pub mod api;
pub mod config;
pub mod playback;
pub mod sim;
pub mod stream;
pub mod types;

// Re-export deployment configuration
pub use config::SimConfig;

// Re-export commonly used types
pub use types::{
    AggregateMetrics, PanelCounts, PanelReading, PanelStatus, PlaybackFrame, PlaybackRecord,
    StreamEvent,
};

// Re-export the simulation core
pub use sim::{summarize, FleetState, SharedSim, SimState, UniformSource};

// Re-export delivery components
pub use playback::PlaybackSource;
pub use stream::{SessionRegistry, StartError};
