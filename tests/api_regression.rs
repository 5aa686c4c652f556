//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! all /api/* endpoints using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port - runs in CI without `#[ignore]`.

use std::time::Duration;

use axum::body::{Body, BodyDataStream};
use axum::http::{Request, StatusCode};
use futures::StreamExt;
use tower::ServiceExt;

use solar_twin::api::{create_app, DashboardState};
use solar_twin::playback::PlaybackSource;
use solar_twin::sim::SimState;
use solar_twin::types::PlaybackRecord;

fn record(id: usize) -> PlaybackRecord {
    PlaybackRecord {
        id,
        timestamp: format!("2024-06-01T10:0{id}:00Z"),
        power: id as f64 * 100.0,
        current: 2.0,
        voltage: 230.0,
        irradiance: 750.0,
        temperature: 21.0,
    }
}

/// State with no playback data loaded.
fn empty_state() -> DashboardState {
    DashboardState::new(SimState::new(30).into_shared(), Duration::from_secs(60))
}

/// State with `n` playback records loaded.
fn loaded_state(n: usize) -> DashboardState {
    let mut sim = SimState::new(30);
    sim.playback = PlaybackSource::from_records((1..=n).map(record).collect());
    DashboardState::new(sim.into_shared(), Duration::from_secs(60))
}

async fn get(state: DashboardState, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = create_app(state);
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post(state: DashboardState, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = create_app(state);
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// All GET endpoints return 200 when data is loaded.
#[tokio::test]
async fn test_get_endpoints_return_200_with_data() {
    let endpoints = [
        "/api/health",
        "/api/solar/live-panels",
        "/api/solar/status",
        "/api/solar/sample",
    ];

    for endpoint in &endpoints {
        let (status, json) = get(loaded_state(5), endpoint).await;
        assert!(
            status.is_success(),
            "GET {endpoint} returned status {status}"
        );
        assert!(json.is_object(), "GET {endpoint} should return a JSON object");
    }
}

#[tokio::test]
async fn test_health_shape() {
    let (status, json) = get(loaded_state(3), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["panelCount"], 30);
    assert_eq!(json["dataPoints"], 3);
    assert_eq!(json["dataLoaded"], true);
    assert_eq!(json["pollsServed"], 0);
    assert_eq!(json["ticksBroadcast"], 0);
    assert!(json.get("timestamp").is_some());
}

/// The health counters track actual activity: polls bump `pollsServed`,
/// a running broadcast timer bumps `ticksBroadcast`.
#[tokio::test]
async fn test_health_counters_track_polls_and_broadcast_ticks() {
    let mut sim = SimState::new(30);
    sim.playback = PlaybackSource::from_records((1..=3).map(record).collect());
    let state = DashboardState::new(sim.into_shared(), Duration::from_millis(5));

    get(state.clone(), "/api/solar/live-panels").await;
    post(state.clone(), "/api/solar/start").await;
    tokio::time::sleep(Duration::from_millis(40)).await;
    post(state.clone(), "/api/solar/stop").await;

    let (status, json) = get(state, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pollsServed"], 1);
    assert!(json["ticksBroadcast"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_live_panels_snapshot_shape() {
    let (status, json) = get(loaded_state(3), "/api/solar/live-panels").await;
    assert_eq!(status, StatusCode::OK);

    let panels = json["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 30);
    for panel in panels {
        let power = panel["power"].as_f64().unwrap();
        let voltage = panel["voltage"].as_f64().unwrap();
        let current = panel["current"].as_f64().unwrap();
        assert!(power >= 0.0);
        if power > 0.0 {
            assert!((current - power / voltage).abs() < 1e-9);
        } else {
            assert_eq!(current, 0.0);
        }
        let status = panel["status"].as_str().unwrap();
        if status == "fault" {
            assert_eq!(power, 0.0);
        }
    }

    let counts = &json["metrics"]["panelCounts"];
    let total = counts["total"].as_u64().unwrap();
    assert_eq!(total, 30);
    assert_eq!(
        counts["normal"].as_u64().unwrap()
            + counts["warning"].as_u64().unwrap()
            + counts["fault"].as_u64().unwrap(),
        total
    );
    assert!(json["metrics"]["totalPower"].as_f64().unwrap() >= 0.0);

    // First poll returns the first playback record.
    assert_eq!(json["currentPlaybackRecord"]["currentIndex"], 1);
    assert_eq!(json["currentPlaybackRecord"]["totalPoints"], 3);
}

/// Pull mode on the same shared state: each poll is one simulation step and
/// one playback advance, wrapping at the end.
#[tokio::test]
async fn test_live_panels_polls_advance_playback_with_wraparound() {
    let state = loaded_state(3);
    let mut seen = Vec::new();
    for _ in 0..4 {
        let app = create_app(state.clone());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/solar/live-panels")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        seen.push(json["currentPlaybackRecord"]["currentIndex"].as_u64().unwrap());
    }
    assert_eq!(seen, vec![1, 2, 3, 1]);
}

#[tokio::test]
async fn test_live_panels_without_data_has_null_playback_record() {
    let (status, json) = get(empty_state(), "/api/solar/live-panels").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["currentPlaybackRecord"].is_null());
    assert_eq!(json["panels"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn test_start_without_data_is_400_and_stays_stopped() {
    let state = empty_state();
    let (status, json) = post(state.clone(), "/api/solar/start").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("No data loaded"));

    let (_, status_json) = get(state, "/api/solar/status").await;
    assert_eq!(status_json["isRunning"], false);
}

#[tokio::test]
async fn test_start_stop_flow_is_idempotent() {
    let state = loaded_state(3);

    let (status, json) = post(state.clone(), "/api/solar/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Simulation started");
    assert_eq!(json["isRunning"], true);

    // Double start: no-op report, still running.
    let (status, json) = post(state.clone(), "/api/solar/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Simulation already running");
    assert_eq!(json["isRunning"], true);

    let (_, status_json) = get(state.clone(), "/api/solar/status").await;
    assert_eq!(status_json["isRunning"], true);

    let (status, json) = post(state.clone(), "/api/solar/stop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Simulation stopped");
    assert_eq!(json["isRunning"], false);

    // Double stop: no-op report, still stopped.
    let (status, json) = post(state.clone(), "/api/solar/stop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Simulation not running");
    assert_eq!(json["isRunning"], false);
}

#[tokio::test]
async fn test_status_shape() {
    let (status, json) = get(loaded_state(7), "/api/solar/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["isRunning"], false);
    assert_eq!(json["currentIndex"], 0);
    assert_eq!(json["totalDataPoints"], 7);
    assert_eq!(json["hasData"], true);
}

#[tokio::test]
async fn test_sample_returns_first_five_records() {
    let (status, json) = get(loaded_state(8), "/api/solar/sample").await;
    assert_eq!(status, StatusCode::OK);
    let sample = json["sampleData"].as_array().unwrap();
    assert_eq!(sample.len(), 5);
    assert_eq!(sample[0]["id"], 1);
    assert_eq!(json["totalPoints"], 8);
}

#[tokio::test]
async fn test_sample_without_data_is_404() {
    let (status, json) = get(empty_state(), "/api/solar/sample").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No data loaded");
}

// ============================================================================
// SSE Stream Endpoint
// ============================================================================

/// Open the SSE endpoint and hand back the live body stream.
async fn open_stream(state: DashboardState) -> BodyDataStream {
    let app = create_app(state);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/solar/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
    resp.into_body().into_data_stream()
}

/// Read SSE frames until one carries a `data:` payload, and parse it.
/// Comment-only keep-alive frames are skipped.
async fn next_sse_json(body: &mut BodyDataStream, buf: &mut String) -> serde_json::Value {
    loop {
        if let Some(pos) = buf.find("\n\n") {
            let frame: String = buf.drain(..pos + 2).collect();
            if let Some(payload) = frame.lines().find_map(|l| l.strip_prefix("data: ")) {
                return serde_json::from_str(payload).unwrap();
            }
            continue;
        }
        let chunk = body
            .next()
            .await
            .expect("stream closed before an event arrived")
            .unwrap();
        buf.push_str(std::str::from_utf8(&chunk).unwrap());
    }
}

/// Every subscription is acknowledged before any data: the first event on
/// the wire is the connected notice carrying the data-set size and run state.
#[tokio::test]
async fn test_stream_first_event_is_connected_acknowledgement() {
    let state = loaded_state(3);
    let mut body = open_stream(state.clone()).await;

    let mut buf = String::new();
    let event = next_sse_json(&mut body, &mut buf).await;
    assert_eq!(event["type"], "connected");
    assert_eq!(event["totalDataPoints"], 3);
    assert_eq!(event["isRunning"], false);
    assert_eq!(state.sim.read().await.registry.count(), 1);
}

/// Frames broadcast while running arrive on an already-open subscription,
/// in playback order with fresh timestamps.
#[tokio::test]
async fn test_stream_delivers_data_frames_after_start() {
    let mut sim = SimState::new(30);
    sim.playback = PlaybackSource::from_records((1..=3).map(record).collect());
    let state = DashboardState::new(sim.into_shared(), Duration::from_millis(5));

    let mut body = open_stream(state.clone()).await;
    let mut buf = String::new();
    let connected = next_sse_json(&mut body, &mut buf).await;
    assert_eq!(connected["type"], "connected");

    let (status, _) = post(state.clone(), "/api/solar/start").await;
    assert_eq!(status, StatusCode::OK);

    let first = next_sse_json(&mut body, &mut buf).await;
    assert_eq!(first["type"], "data");
    assert_eq!(first["currentIndex"], 1);
    assert_ne!(first["timestamp"], record(1).timestamp);

    let second = next_sse_json(&mut body, &mut buf).await;
    assert_eq!(second["type"], "data");
    assert_eq!(second["currentIndex"], 2);

    post(state, "/api/solar/stop").await;
}

/// Dropping the client transport removes the subscriber from the registry,
/// whether or not the simulation is running.
#[tokio::test]
async fn test_stream_disconnect_removes_subscriber() {
    let state = loaded_state(3);
    let mut body = open_stream(state.clone()).await;

    let mut buf = String::new();
    next_sse_json(&mut body, &mut buf).await;
    assert_eq!(state.sim.read().await.registry.count(), 1);

    drop(body);
    let mut reaped = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if state.sim.read().await.registry.count() == 0 {
            reaped = true;
            break;
        }
    }
    assert!(reaped, "subscriber still registered after disconnect");
}
