//! Sync session and correction loop
//!
//! One session per bootstrapped registry. The session pins a master
//! sink, then runs an interval-driven correction loop: each pass reads
//! the master clock once, classifies every follower's offset against
//! that snapshot, and applies the matching correction.

use crate::registry::{BoundSink, StreamRegistry};
use crate::sink::enforce_silence;
use crate::state::SharedState;
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};
use tracing::{debug, info};
use uuid::Uuid;
use syncwall_common::events::SyncEvent;

/// Offsets at or below this are imperceptible float jitter; leave the
/// follower alone (seconds)
pub const IN_SYNC_TOLERANCE_SECS: f64 = 0.05;

/// Offsets above this are assumed to come from a stall or an external
/// seek; a rate nudge would take too long to converge, so snap
/// (seconds)
pub const HARD_CORRECTION_THRESHOLD_SECS: f64 = 0.15;

/// Rate applied to a follower running behind the master
pub const NUDGE_UP_RATE: f64 = 1.05;

/// Rate applied to a follower running ahead of the master
pub const NUDGE_DOWN_RATE: f64 = 0.95;

/// Normal playback rate; every follower must be back at this rate
/// when the session ends
pub const NORMAL_RATE: f64 = 1.0;

/// Default correction tick period, the render-tick equivalent (~60 Hz)
pub const DEFAULT_TICK: Duration = Duration::from_millis(16);

/// Broadcast the SyncDrift event every N passes (shared state is
/// still overwritten every pass)
const DRIFT_EVENT_INTERVAL_PASSES: u32 = 30;

/// Follower offset classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftState {
    /// diff <= 0.05s: no correction, cancel any prior nudge
    InSync,
    /// 0.05s < diff <= 0.15s: close the gap with a rate nudge
    MinorDrift,
    /// diff > 0.15s: hard correction, snap to the master clock
    MajorDrift,
}

impl DriftState {
    /// Classify an absolute follower offset in seconds
    pub fn classify(diff: f64) -> Self {
        if diff > HARD_CORRECTION_THRESHOLD_SECS {
            DriftState::MajorDrift
        } else if diff > IN_SYNC_TOLERANCE_SECS {
            DriftState::MinorDrift
        } else {
            DriftState::InSync
        }
    }
}

/// Sync session: the correction loop plus its pinned master
pub struct SyncSession {
    registry: Arc<StreamRegistry>,
    state: Arc<SharedState>,

    /// Master sink identity, pinned on first resolution and never
    /// re-elected for the life of the session
    master_id: Arc<OnceLock<Uuid>>,

    /// Correction loop running flag
    running: Arc<RwLock<bool>>,

    /// Correction tick period
    tick: Duration,
}

impl SyncSession {
    pub fn new(registry: Arc<StreamRegistry>, state: Arc<SharedState>, tick: Duration) -> Self {
        Self {
            registry,
            state,
            master_id: Arc::new(OnceLock::new()),
            running: Arc::new(RwLock::new(false)),
            tick,
        }
    }

    /// Resolve the master sink.
    ///
    /// Default candidate is the first sink in registry order; the
    /// first successful resolution is pinned. A stable reference
    /// clock prevents oscillation from master hand-off.
    pub fn master(&self) -> Option<&BoundSink> {
        if let Some(id) = self.master_id.get() {
            return self.registry.iter().find(|s| s.sink_id == *id);
        }
        let first = self.registry.first()?;
        let _ = self.master_id.set(first.sink_id);
        Some(first)
    }

    /// Start the correction loop in the background
    pub async fn start(&self) {
        info!("Starting sync session ({} sinks)", self.registry.len());
        *self.running.write().await = true;

        let session = self.clone_handles();
        tokio::spawn(async move {
            session.sync_loop().await;
        });
    }

    /// Stop the correction loop and release follower rates.
    ///
    /// Leaving a nudged rate in place would leave the sink permanently
    /// sped up or slowed down, so the reset happens here as well as on
    /// the loop's own exit path.
    pub async fn stop(&self) {
        info!("Stopping sync session");
        *self.running.write().await = false;
        self.reset_rates();
    }

    /// One correction pass across all followers.
    ///
    /// Reads the master clock exactly once, so every follower in the
    /// pass is corrected against the same snapshot. Returns the
    /// largest follower offset observed.
    pub fn correction_pass(&self) -> f64 {
        // Single snapshot per pass: every follower is corrected
        // against the same master time
        let (master_id, master_time) = match self.master() {
            Some(master) => (master.sink_id, master.sink.current_time()),
            // No sink bound yet: no-op this tick, retried on the next
            None => return 0.0,
        };

        let mut max_drift = 0.0f64;

        for entry in self.registry.iter() {
            if entry.sink_id == master_id {
                // The master keeps its own clock; only the silence
                // invariant is re-asserted
                enforce_silence(entry.sink.as_ref());
                continue;
            }

            let follower_time = entry.sink.current_time();
            let diff = (follower_time - master_time).abs();
            max_drift = max_drift.max(diff);

            match DriftState::classify(diff) {
                DriftState::MajorDrift => {
                    debug!(
                        "Hard correction: sink {} {:.3}s -> {:.3}s",
                        entry.sink_id, follower_time, master_time
                    );
                    entry.sink.set_current_time(master_time);
                    self.state.broadcast_event(SyncEvent::HardCorrection {
                        sink_id: entry.sink_id,
                        from_secs: follower_time,
                        to_secs: master_time,
                        timestamp: chrono::Utc::now(),
                    });
                }
                DriftState::MinorDrift => {
                    let rate = if follower_time < master_time {
                        NUDGE_UP_RATE
                    } else {
                        NUDGE_DOWN_RATE
                    };
                    entry.sink.set_playback_rate(rate);
                }
                DriftState::InSync => {
                    entry.sink.set_playback_rate(NORMAL_RATE);
                }
            }

            // The sink may silently reset mute/volume; re-assert every pass
            enforce_silence(entry.sink.as_ref());
        }

        self.state.set_max_drift(max_drift);
        max_drift
    }

    /// Interval-driven correction loop; runs until stop() clears the
    /// running flag
    async fn sync_loop(&self) {
        let mut tick = interval(self.tick);
        let mut event_counter = 0u32;

        loop {
            tick.tick().await;

            if !*self.running.read().await {
                debug!("Sync loop stopping");
                break;
            }

            let max_drift = self.correction_pass();

            event_counter += 1;
            if event_counter >= DRIFT_EVENT_INTERVAL_PASSES {
                event_counter = 0;
                self.state.broadcast_event(SyncEvent::SyncDrift {
                    max_drift,
                    sink_count: self.registry.len(),
                    timestamp: chrono::Utc::now(),
                });
            }
        }

        // Rate-reset contract holds on the loop exit path too
        self.reset_rates();
    }

    /// Return every follower to normal playback rate
    fn reset_rates(&self) {
        let master_id = self.master_id.get().copied();
        for entry in self.registry.iter() {
            if Some(entry.sink_id) != master_id {
                entry.sink.set_playback_rate(NORMAL_RATE);
            }
        }
    }

    /// Clone handles for the spawned loop task
    fn clone_handles(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            state: Arc::clone(&self.state),
            master_id: Arc::clone(&self.master_id),
            running: Arc::clone(&self.running),
            tick: self.tick,
        }
    }
}
