//! Shared controller state
//!
//! Thread-safe shared state coordinating the sync engine, transport
//! controller, and HTTP handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, RwLock};
use syncwall_common::events::{PlaybackState, SyncEvent};

/// Shared state accessible by all components
pub struct SharedState {
    /// Session-wide playback state (Playing or Paused)
    pub playback_state: RwLock<PlaybackState>,

    /// Largest follower drift observed in the most recent correction
    /// pass, stored as f64 bits for lock-free access from the
    /// per-tick loop
    max_drift_bits: AtomicU64,

    /// Event broadcaster for SSE events
    pub event_tx: broadcast::Sender<SyncEvent>,
}

impl SharedState {
    /// Create new shared state with default values
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100); // Buffer up to 100 events
        Self {
            playback_state: RwLock::new(PlaybackState::Paused),
            max_drift_bits: AtomicU64::new(0f64.to_bits()),
            event_tx,
        }
    }

    /// Broadcast an event to all SSE listeners
    pub fn broadcast_event(&self, event: SyncEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to event stream for SSE
    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.event_tx.subscribe()
    }

    /// Get session playback state
    pub async fn get_playback_state(&self) -> PlaybackState {
        *self.playback_state.read().await
    }

    /// Set session playback state
    pub async fn set_playback_state(&self, state: PlaybackState) {
        *self.playback_state.write().await = state;
    }

    /// Latest aggregate drift metric (seconds)
    pub fn max_drift(&self) -> f64 {
        f64::from_bits(self.max_drift_bits.load(Ordering::Relaxed))
    }

    /// Overwrite the aggregate drift metric (called once per pass)
    pub fn set_max_drift(&self, drift: f64) {
        self.max_drift_bits.store(drift.to_bits(), Ordering::Relaxed);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
