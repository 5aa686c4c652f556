//! Simulation Context
//!
//! Single owning context for all process-wide mutable simulation state:
//! fleet readings, playback cursor, subscriber registry, and run state.
//! Wrapped in `Arc<RwLock<>>` so API handlers and the broadcast timer share
//! it; every mutation happens under the write lock, so snapshots never
//! observe a partial tick. No ambient globals - tests instantiate isolated
//! contexts and multiple simulated fleets could coexist.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::playback::PlaybackSource;
use crate::sim::{FleetState, ThreadRngSource, UniformSource, DEFAULT_PANEL_COUNT};
use crate::stream::SessionRegistry;

/// Shared handle to the simulation context.
pub type SharedSim = Arc<RwLock<SimState>>;

/// All mutable state owned by one simulated fleet deployment.
pub struct SimState {
    /// Current readings for the fleet
    pub fleet: FleetState,

    /// Recorded data replay source
    pub playback: PlaybackSource,

    /// Active push subscribers
    pub registry: SessionRegistry,

    /// Randomness seam for the tick simulator
    pub rng: Box<dyn UniformSource>,

    /// Whether the push-mode timer is armed
    pub is_running: bool,

    /// Cancellation handle for the live timer, present only while running
    pub timer: Option<CancellationToken>,

    /// Configured fleet size, applied on first initialization
    pub panel_count: usize,

    /// Process start, for the health endpoint
    pub started_at: Instant,

    /// Pull-mode requests served (each one is a simulation step)
    pub polls_served: u64,

    /// Push-mode ticks broadcast since process start
    pub ticks_broadcast: u64,
}

impl SimState {
    /// Fresh context with an empty fleet and no playback data.
    pub fn new(panel_count: usize) -> Self {
        Self {
            fleet: FleetState::new(),
            playback: PlaybackSource::empty(),
            registry: SessionRegistry::new(),
            rng: Box::new(ThreadRngSource),
            is_running: false,
            timer: None,
            panel_count,
            started_at: Instant::now(),
            polls_served: 0,
            ticks_broadcast: 0,
        }
    }

    /// Wrap a context for sharing across handlers and timer tasks.
    pub fn into_shared(self) -> SharedSim {
        Arc::new(RwLock::new(self))
    }

    /// Populate the fleet if it is still empty. Idempotent.
    pub fn ensure_fleet(&mut self) {
        let n = self.panel_count;
        self.fleet.initialize(n, self.rng.as_mut());
    }

    /// Advance the fleet one synthetic interval.
    pub fn tick(&mut self) {
        self.fleet.advance(self.rng.as_mut());
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new(DEFAULT_PANEL_COUNT)
    }
}

impl std::fmt::Debug for SimState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimState")
            .field("panels", &self.fleet.len())
            .field("playback_len", &self.playback.len())
            .field("subscribers", &self.registry.count())
            .field("is_running", &self.is_running)
            .finish_non_exhaustive()
    }
}
