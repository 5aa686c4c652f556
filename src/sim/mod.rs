//! Panel fleet simulation
//!
//! - `fleet`: fleet state store and the per-tick update rule
//! - `aggregate`: fleet-wide summary metrics
//! - `rng`: pluggable uniform randomness seam
//! - `state`: the owning simulation context shared across delivery modes

mod aggregate;
mod fleet;
mod rng;
mod state;

pub use aggregate::summarize;
pub use fleet::{FleetState, DEFAULT_PANEL_COUNT};
pub use rng::{SequenceSource, ThreadRngSource, UniformSource};
pub use state::{SharedSim, SimState};
