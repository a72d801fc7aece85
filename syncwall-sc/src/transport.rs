//! Transport controller
//!
//! Applies user-initiated transport commands uniformly across every
//! sink in the registry. Each per-sink attempt is independent; one
//! sink failing never aborts the others.

use crate::registry::StreamRegistry;
use crate::sink::PlayRejected;
use crate::state::SharedState;
use crate::sync::SyncSession;
use crate::error::{Error, Result};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use syncwall_common::events::{PlaybackState, SyncEvent};

/// Outcome of one sink's play attempt
pub struct PlayOutcome {
    pub sink_id: Uuid,
    pub source_url: String,
    pub result: std::result::Result<(), PlayRejected>,
}

/// Session-wide transport commands
pub struct TransportController {
    registry: Arc<StreamRegistry>,
    session: Arc<SyncSession>,
    state: Arc<SharedState>,
}

impl TransportController {
    pub fn new(
        registry: Arc<StreamRegistry>,
        session: Arc<SyncSession>,
        state: Arc<SharedState>,
    ) -> Self {
        Self {
            registry,
            session,
            state,
        }
    }

    /// Attempt to start playback on every sink.
    ///
    /// Rejections (autoplay policy, media errors) are per-sink and are
    /// surfaced in the returned outcome set rather than swallowed.
    pub async fn play_all(&self) -> Vec<PlayOutcome> {
        let mut outcomes = Vec::with_capacity(self.registry.len());

        for entry in self.registry.iter() {
            let result = entry.sink.play().await;
            if let Err(rejected) = &result {
                warn!("Sink {} refused to play: {}", entry.sink_id, rejected);
            }
            outcomes.push(PlayOutcome {
                sink_id: entry.sink_id,
                source_url: entry.source_url.clone(),
                result,
            });
        }

        let started = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!("Play command: {}/{} sinks started", started, outcomes.len());

        if started > 0 {
            self.state.set_playback_state(PlaybackState::Playing).await;
            self.state.broadcast_event(SyncEvent::PlaybackStateChanged {
                state: PlaybackState::Playing,
                timestamp: chrono::Utc::now(),
            });
        }

        outcomes
    }

    /// Pause every sink, best-effort
    pub async fn pause_all(&self) {
        for entry in self.registry.iter() {
            entry.sink.pause();
        }
        info!("Pause command applied to {} sinks", self.registry.len());

        self.state.set_playback_state(PlaybackState::Paused).await;
        self.state.broadcast_event(SyncEvent::PlaybackStateChanged {
            state: PlaybackState::Paused,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Seek every sink relative to the master clock.
    ///
    /// All sinks snap to the same absolute target (clamped at 0),
    /// which doubles as an implicit correction pass. Returns the
    /// target position.
    pub async fn seek(&self, delta_seconds: f64) -> Result<f64> {
        let master = self
            .session
            .master()
            .ok_or_else(|| Error::NotFound("no master sink resolved".to_string()))?;

        let new_time = (master.sink.current_time() + delta_seconds).max(0.0);
        info!("Seek {:+.3}s -> {:.3}s across {} sinks", delta_seconds, new_time, self.registry.len());

        for entry in self.registry.iter() {
            entry.sink.set_current_time(new_time);
        }

        self.state.broadcast_event(SyncEvent::TransportSeek {
            position_secs: new_time,
            timestamp: chrono::Utc::now(),
        });

        Ok(new_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BoundSink;
    use crate::sink::testing::FakeSink;
    use crate::sink::PlayableSink;
    use crate::sync::engine::DEFAULT_TICK;

    fn harness(sinks: Vec<Arc<FakeSink>>) -> (TransportController, Vec<Arc<FakeSink>>) {
        let bound = sinks
            .iter()
            .enumerate()
            .map(|(i, sink)| BoundSink {
                sink_id: Uuid::new_v4(),
                source_url: format!("http://host/streams/stream{}/playlist.m3u8", i + 1),
                sink: Arc::clone(sink) as Arc<dyn PlayableSink>,
            })
            .collect();
        let registry = Arc::new(StreamRegistry::from_sinks(bound));
        let state = Arc::new(SharedState::new());
        let session = Arc::new(SyncSession::new(
            Arc::clone(&registry),
            Arc::clone(&state),
            DEFAULT_TICK,
        ));
        (
            TransportController::new(registry, session, state),
            sinks,
        )
    }

    #[tokio::test]
    async fn test_seek_snaps_all_sinks_to_master_relative_target() {
        // seek(-5) with master at t=20 -> every sink at 15
        let (transport, sinks) =
            harness(vec![FakeSink::at(20.0), FakeSink::at(19.5), FakeSink::at(21.0)]);

        let target = transport.seek(-5.0).await.unwrap();

        assert_eq!(target, 15.0);
        for sink in &sinks {
            assert_eq!(sink.position(), 15.0);
        }
    }

    #[tokio::test]
    async fn test_seek_clamps_at_zero() {
        // seek(-5) with master at t=2 -> clamps to 0, never negative
        let (transport, sinks) = harness(vec![FakeSink::at(2.0), FakeSink::at(2.1)]);

        let target = transport.seek(-5.0).await.unwrap();

        assert_eq!(target, 0.0);
        assert_eq!(sinks[0].position(), 0.0);
        assert_eq!(sinks[1].position(), 0.0);
    }

    #[tokio::test]
    async fn test_seek_without_sinks_is_not_found() {
        let (transport, _) = harness(vec![]);
        assert!(matches!(
            transport.seek(-5.0).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_play_all_surfaces_per_sink_rejections() {
        let (transport, sinks) = harness(vec![
            FakeSink::at(0.0),
            FakeSink::rejecting(0.0, "autoplay blocked"),
            FakeSink::at(0.0),
        ]);

        let outcomes = transport.play_all().await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert!(outcomes[2].result.is_ok());

        // Rejection on one sink did not abort the others
        assert!(*sinks[0].playing.lock().unwrap());
        assert!(!*sinks[1].playing.lock().unwrap());
        assert!(*sinks[2].playing.lock().unwrap());
    }

    #[tokio::test]
    async fn test_play_then_pause_tracks_session_state() {
        let (transport, sinks) = harness(vec![FakeSink::at(0.0), FakeSink::at(0.0)]);

        transport.play_all().await;
        for sink in &sinks {
            assert!(*sink.playing.lock().unwrap());
        }

        transport.pause_all().await;
        for sink in &sinks {
            assert!(!*sink.playing.lock().unwrap());
        }
    }
}
