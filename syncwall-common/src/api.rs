//! API request/response types shared between the sync controller and
//! its HTTP clients

use crate::events::PlaybackState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seek request body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeekRequest {
    /// Relative offset applied to the master clock (seconds, may be
    /// negative)
    pub delta_seconds: f64,
}

/// Seek response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeekResponse {
    /// Absolute position every sink was set to (seconds)
    pub position: f64,
}

/// Per-sink outcome of a session-wide play command
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayOutcomeInfo {
    pub sink_id: Uuid,
    pub source_url: String,
    /// True if the sink accepted the play request
    pub started: bool,
    /// Rejection reason when started is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Response to a session-wide play command
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayAllResponse {
    pub outcomes: Vec<PlayOutcomeInfo>,
}

/// One bound registry slot as reported by the API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamInfo {
    pub sink_id: Uuid,
    pub source_url: String,
    /// Current playback position (seconds)
    pub position: f64,
    /// True if this sink is the session master
    pub master: bool,
}

/// Sync session status
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncStatusResponse {
    /// Source URL of the master sink, if one resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_url: Option<String>,
    pub sink_count: usize,
    /// Largest follower offset observed in the most recent pass (seconds)
    pub max_drift: f64,
    pub playback_state: PlaybackState,
}
