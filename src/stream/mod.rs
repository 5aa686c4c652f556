//! Push-mode delivery: subscriber registry and broadcast timer.

pub mod broadcaster;
mod registry;

pub use broadcaster::{StartError, StartOutcome, StopOutcome};
pub use registry::SessionRegistry;
