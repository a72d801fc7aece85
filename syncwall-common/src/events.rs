//! Event types for the syncwall event system
//!
//! Events are broadcast by the sync controller and streamed to SSE
//! clients as tagged JSON.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Syncwall event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SyncEvent {
    /// Aggregate drift metric, published once per correction pass
    SyncDrift {
        /// Largest absolute follower offset observed this pass (seconds)
        max_drift: f64,
        /// Number of sinks in the registry
        sink_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A follower drifted beyond the hard-correction threshold and
    /// was snapped to the master clock
    HardCorrection {
        sink_id: Uuid,
        /// Follower position before the correction (seconds)
        from_secs: f64,
        /// Master position the follower was snapped to (seconds)
        to_secs: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session-wide playback state changed
    PlaybackStateChanged {
        state: PlaybackState,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session-wide seek applied to every sink
    TransportSeek {
        /// Absolute target position all sinks were set to (seconds)
        position_secs: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A discovered source URL was bound to a playable sink
    SinkBound {
        sink_id: Uuid,
        source_url: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A discovered source URL failed to bind (degraded registry)
    SinkBindFailed {
        source_url: String,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Session-wide playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_drift_serialization() {
        let event = SyncEvent::SyncDrift {
            max_drift: 0.042,
            sink_count: 4,
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"SyncDrift\""));
        assert!(json.contains("\"max_drift\":0.042"));

        let parsed: SyncEvent = serde_json::from_str(&json).unwrap();
        match parsed {
            SyncEvent::SyncDrift { sink_count, .. } => assert_eq!(sink_count, 4),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_playback_state_serialization() {
        let json = serde_json::to_string(&PlaybackState::Playing).unwrap();
        assert_eq!(json, "\"playing\"");

        let state: PlaybackState = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(state, PlaybackState::Paused);
    }
}
