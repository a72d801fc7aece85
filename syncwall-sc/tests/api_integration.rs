//! Integration tests for the sync controller API
//!
//! Exercises the complete HTTP surface over an in-memory router:
//! health, registry listing, sync status, and transport control.

use axum::body::Body;
use axum::http::StatusCode;
use http::{Method, Request};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use syncwall_sc::api::{create_router, AppContext};
use syncwall_sc::registry::StreamRegistry;
use syncwall_sc::sink::ClockSinkLoader;
use syncwall_sc::state::SharedState;
use syncwall_sc::sync::engine::DEFAULT_TICK;
use syncwall_sc::sync::SyncSession;
use syncwall_sc::transport::TransportController;

/// Build a router over a registry bound from the given URLs
async fn setup_router(urls: &[&str]) -> axum::Router {
    let urls: Vec<String> = urls.iter().map(|u| u.to_string()).collect();
    let state = Arc::new(SharedState::new());
    let registry = Arc::new(StreamRegistry::bootstrap(&ClockSinkLoader, &urls, &state).await);
    let session = Arc::new(SyncSession::new(
        Arc::clone(&registry),
        Arc::clone(&state),
        DEFAULT_TICK,
    ));
    let transport = Arc::new(TransportController::new(
        Arc::clone(&registry),
        Arc::clone(&session),
        Arc::clone(&state),
    ));

    create_router(AppContext {
        state,
        registry,
        session,
        transport,
        port: 5760,
    })
}

async fn request(
    app: &axum::Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Option<Value>) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let app = setup_router(&["http://host/streams/stream1/playlist.m3u8"]).await;

    let (status, body) = request(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["module"], "sync_controller");
}

#[tokio::test]
async fn test_streams_lists_registry_in_order_with_master_flag() {
    let app = setup_router(&[
        "http://host/streams/stream1/playlist.m3u8",
        "http://host/streams/stream2/playlist.m3u8",
    ])
    .await;

    let (status, body) = request(&app, Method::GET, "/api/v1/streams", None).await;
    assert_eq!(status, StatusCode::OK);
    let streams = body.unwrap();
    let streams = streams.as_array().unwrap();
    assert_eq!(streams.len(), 2);
    assert!(streams[0]["source_url"]
        .as_str()
        .unwrap()
        .contains("stream1"));
    assert_eq!(streams[0]["master"], true);
    assert_eq!(streams[1]["master"], false);
}

#[tokio::test]
async fn test_sync_status() {
    let app = setup_router(&["http://host/streams/stream1/playlist.m3u8"]).await;

    let (status, body) = request(&app, Method::GET, "/api/v1/sync/status", None).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["sink_count"], 1);
    assert_eq!(body["max_drift"], 0.0);
    assert_eq!(body["playback_state"], "paused");
    assert!(body["master_url"].as_str().unwrap().contains("stream1"));
}

#[tokio::test]
async fn test_play_reports_per_sink_outcomes() {
    let app = setup_router(&[
        "http://host/streams/stream1/playlist.m3u8",
        "http://host/streams/stream2/playlist.m3u8",
    ])
    .await;

    let (status, body) = request(&app, Method::POST, "/api/v1/transport/play", None).await;
    assert_eq!(status, StatusCode::OK);
    let outcomes = body.unwrap()["outcomes"].as_array().unwrap().to_vec();
    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        assert_eq!(outcome["started"], true);
    }

    // Session state now reports playing
    let (_, body) = request(&app, Method::GET, "/api/v1/sync/status", None).await;
    assert_eq!(body.unwrap()["playback_state"], "playing");
}

#[tokio::test]
async fn test_pause_returns_no_content() {
    let app = setup_router(&["http://host/streams/stream1/playlist.m3u8"]).await;

    let (status, body) = request(&app, Method::POST, "/api/v1/transport/pause", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());
}

#[tokio::test]
async fn test_seek_forward_and_clamped() {
    let app = setup_router(&["http://host/streams/stream1/playlist.m3u8"]).await;

    // Sinks start at 0; +5 lands at 5
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/transport/seek",
        Some(serde_json::json!({ "delta_seconds": 5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["position"], 5.0);

    // -10 from 5 clamps at 0
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/transport/seek",
        Some(serde_json::json!({ "delta_seconds": -10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["position"], 0.0);
}

#[tokio::test]
async fn test_seek_with_empty_registry_is_not_found() {
    let app = setup_router(&[]).await;

    let (status, _) = request(
        &app,
        Method::POST,
        "/api/v1/transport/seek",
        Some(serde_json::json!({ "delta_seconds": 5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
