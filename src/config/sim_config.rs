//! Deployment configuration - all tunables as TOML values
//!
//! Every struct implements `Default`, ensuring a usable deployment when no
//! config file is present.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Root configuration for a telemetry feed deployment.
///
/// Load with `SimConfig::load()` which searches:
/// 1. `$SOLAR_TWIN_CONFIG` env var
/// 2. `./solar_twin.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Simulated fleet sizing
    #[serde(default)]
    pub fleet: FleetConfig,

    /// Push-mode stream cadence
    #[serde(default)]
    pub stream: StreamConfig,

    /// Recorded-data playback
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server
    #[serde(default = "default_addr")]
    pub addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Number of simulated panels, fixed at startup
    #[serde(default = "default_panel_count")]
    pub panel_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Milliseconds between push-mode broadcasts
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Path to the recorded solar data CSV
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
}

fn default_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_panel_count() -> usize {
    crate::sim::DEFAULT_PANEL_COUNT
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_csv_path() -> String {
    "final.csv".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            panel_count: default_panel_count(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

impl SimConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("SOLAR_TWIN_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from SOLAR_TWIN_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SOLAR_TWIN_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SOLAR_TWIN_CONFIG points to non-existent file, falling back");
            }
        }

        let local = Path::new("solar_twin.toml");
        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "Loaded config from ./solar_twin.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse ./solar_twin.toml, using defaults");
                }
            }
        }

        Self::default()
    }

    /// Parse a specific TOML file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
