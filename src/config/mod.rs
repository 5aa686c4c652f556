//! Deployment Configuration Module
//!
//! Server address, fleet size, stream cadence, and the playback CSV path,
//! loaded from a TOML file with built-in defaults.
//!
//! ## Loading Order
//!
//! 1. `SOLAR_TWIN_CONFIG` environment variable (path to TOML file)
//! 2. `solar_twin.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(SimConfig::load());
//!
//! // Anywhere in the codebase:
//! let cadence = config::get().stream.tick_interval_ms;
//! ```

mod sim_config;

pub use sim_config::*;

use std::sync::OnceLock;

/// Global deployment configuration, initialized once at startup.
static SIM_CONFIG: OnceLock<SimConfig> = OnceLock::new();

/// Initialize the global configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: SimConfig) {
    if SIM_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once - ignoring");
    }
}

/// Get a reference to the global configuration.
///
/// Panics if `init()` has not been called - a missing config is a startup
/// bug, not a recoverable condition.
pub fn get() -> &'static SimConfig {
    SIM_CONFIG
        .get()
        .expect("config::get() called before config::init() - this is a startup bug")
}
