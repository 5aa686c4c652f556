//! Solar Twin - Solar Panel Digital Twin Server
//!
//! Simulated telemetry feed for a small solar panel fleet, exposed over
//! HTTP/SSE to a polling or streaming dashboard.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (30 panels, final.csv playback if present)
//! cargo run --release
//!
//! # Custom address and data file
//! cargo run --release -- --addr 0.0.0.0:8080 --csv data/recorded.csv
//! ```
//!
//! # Environment Variables
//!
//! - `SOLAR_TWIN_CONFIG`: Path to a TOML config file
//! - `SOLAR_TWIN_CORS_ORIGINS`: Comma-separated allowed origins
//! - `RUST_LOG`: Logging level (default: info)

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use solar_twin::api::{create_app, DashboardState};
use solar_twin::config::{self, SimConfig};
use solar_twin::playback::PlaybackSource;
use solar_twin::sim::SimState;
use solar_twin::stream::broadcaster;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "solar-twin")]
#[command(about = "Solar Panel Digital Twin Server")]
#[command(version)]
struct CliArgs {
    /// Override the server bind address (default: "0.0.0.0:3001")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to the recorded solar data CSV
    #[arg(long)]
    csv: Option<String>,

    /// Number of simulated panels
    #[arg(long)]
    panels: Option<usize>,

    /// Milliseconds between push-mode broadcasts
    #[arg(long)]
    tick_ms: Option<u64>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    config::init(SimConfig::load());
    let cfg = config::get();

    let server_addr = args.addr.unwrap_or_else(|| cfg.server.addr.clone());
    let csv_path = args.csv.unwrap_or_else(|| cfg.playback.csv_path.clone());
    let panel_count = args.panels.unwrap_or(cfg.fleet.panel_count);
    let tick_interval = Duration::from_millis(args.tick_ms.unwrap_or(cfg.stream.tick_interval_ms));

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Solar Twin - Solar Panel Digital Twin Server");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("");

    // Playback data is optional: a missing CSV degrades push-mode start to
    // an error response while the panel simulation keeps running.
    info!("📊 Loading playback data from: {}", csv_path);
    let playback = PlaybackSource::load(Path::new(&csv_path));
    if playback.is_empty() {
        info!("   No playback data - /api/solar/start will report an error until a CSV is provided");
    }

    let mut sim_state = SimState::new(panel_count);
    sim_state.playback = playback;
    sim_state.ensure_fleet();
    info!("✓ Fleet initialized with {} panels", panel_count);
    let sim = sim_state.into_shared();

    let state = DashboardState::new(Arc::clone(&sim), tick_interval);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;

    info!("🚀 Server running on {}", server_addr);
    info!("📡 Stream endpoint: http://{}/api/solar/stream", server_addr);
    info!("🔧 Control endpoints:");
    info!("   POST http://{}/api/solar/start", server_addr);
    info!("   POST http://{}/api/solar/stop", server_addr);
    info!("   GET  http://{}/api/solar/status", server_addr);
    info!("");

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    // Disarm any live broadcast timer before exit.
    broadcaster::shutdown(&sim).await;

    info!("✓ Solar Twin shutdown complete");
    Ok(())
}
