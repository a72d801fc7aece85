//! HTTP request handlers
//!
//! Implements the REST endpoints for transport control and sync
//! status.

use crate::api::AppContext;
use crate::error::Error;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::{error, info};
use syncwall_common::api::{
    PlayAllResponse, PlayOutcomeInfo, SeekRequest, SeekResponse, StreamInfo, SyncStatusResponse,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
    port: u16,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

/// GET /health - Health check endpoint
pub async fn health(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "sync_controller".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        port: ctx.port,
    })
}

/// GET /api/v1/streams - The bound registry in discovery order
pub async fn get_streams(State(ctx): State<AppContext>) -> Json<Vec<StreamInfo>> {
    let master_id = ctx.session.master().map(|m| m.sink_id);

    let streams = ctx
        .registry
        .iter()
        .map(|entry| StreamInfo {
            sink_id: entry.sink_id,
            source_url: entry.source_url.clone(),
            position: entry.sink.current_time(),
            master: Some(entry.sink_id) == master_id,
        })
        .collect();

    Json(streams)
}

/// GET /api/v1/sync/status - Sync session status
pub async fn get_sync_status(State(ctx): State<AppContext>) -> Json<SyncStatusResponse> {
    Json(SyncStatusResponse {
        master_url: ctx.session.master().map(|m| m.source_url.clone()),
        sink_count: ctx.registry.len(),
        max_drift: ctx.state.max_drift(),
        playback_state: ctx.state.get_playback_state().await,
    })
}

/// POST /api/v1/transport/play - Start playback on every sink
pub async fn play(State(ctx): State<AppContext>) -> Json<PlayAllResponse> {
    info!("Play request received");

    let outcomes = ctx
        .transport
        .play_all()
        .await
        .into_iter()
        .map(|o| PlayOutcomeInfo {
            sink_id: o.sink_id,
            source_url: o.source_url,
            started: o.result.is_ok(),
            reason: o.result.err().map(|e| e.to_string()),
        })
        .collect();

    Json(PlayAllResponse { outcomes })
}

/// POST /api/v1/transport/pause - Pause every sink
pub async fn pause(State(ctx): State<AppContext>) -> StatusCode {
    info!("Pause request received");
    ctx.transport.pause_all().await;
    StatusCode::NO_CONTENT
}

/// POST /api/v1/transport/seek - Relative seek against the master clock
pub async fn seek(
    State(ctx): State<AppContext>,
    Json(req): Json<SeekRequest>,
) -> Result<Json<SeekResponse>, (StatusCode, Json<StatusResponse>)> {
    info!("Seek request: {:+.3}s", req.delta_seconds);

    match ctx.transport.seek(req.delta_seconds).await {
        Ok(position) => Ok(Json(SeekResponse { position })),
        Err(Error::NotFound(msg)) => Err((
            StatusCode::NOT_FOUND,
            Json(StatusResponse {
                status: format!("error: {}", msg),
            }),
        )),
        Err(e) => {
            error!("Seek failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse {
                    status: format!("error: {}", e),
                }),
            ))
        }
    }
}
