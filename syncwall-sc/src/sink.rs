//! Playable sink capability boundary
//!
//! The sync controller never touches a media pipeline directly. It
//! depends on the capability set exposed here: a readable/settable
//! clock, a settable playback rate, forced-silent audio, and
//! play/pause. The HLS client collaborator supplies implementations
//! via [`SourceLoader`].

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// A sink refused to start playback (e.g. host autoplay policy)
#[derive(Error, Debug, Clone)]
#[error("play rejected: {0}")]
pub struct PlayRejected(pub String);

/// One media output under the controller's command.
///
/// Methods take `&self`: implementations are expected to carry their
/// own interior mutability, since the correction loop and the HTTP
/// transport handlers both hold the sink behind an `Arc`.
#[async_trait]
pub trait PlayableSink: Send + Sync {
    /// Current playback position in seconds. Advances on its own as
    /// the sink decodes; that independent progress is exactly the
    /// drift the sync engine measures.
    fn current_time(&self) -> f64;

    /// Seek to an absolute position in seconds
    fn set_current_time(&self, secs: f64);

    /// Set the playback rate multiplier (1.0 = normal speed)
    fn set_playback_rate(&self, rate: f64);

    fn set_muted(&self, muted: bool);

    fn set_volume(&self, volume: f64);

    /// Attempt to start playback. The host may reject (autoplay
    /// policy, media error); rejection is per-sink and non-fatal.
    async fn play(&self) -> std::result::Result<(), PlayRejected>;

    /// Pause playback. Always available for a bound sink.
    fn pause(&self);
}

/// The external HLS client collaborator: loads a source URL into a
/// playable sink.
#[async_trait]
pub trait SourceLoader: Send + Sync {
    async fn bind(&self, url: &str) -> Result<Arc<dyn PlayableSink>>;
}

/// Force-apply the silence invariant: muted = true, volume = 0.
///
/// Applied at the binding boundary and re-asserted by the sync engine
/// every correction pass, in case the sink resets it.
pub fn enforce_silence(sink: &dyn PlayableSink) {
    sink.set_muted(true);
    sink.set_volume(0.0);
}

/// Sink backed by a monotonic clock.
///
/// Stands in for a native HLS integration: while playing, its
/// position advances with wall time scaled by the playback rate,
/// which is all the sync controller observes of a real decoding sink.
pub struct ClockSink {
    inner: std::sync::Mutex<ClockState>,
}

struct ClockState {
    position: f64,
    rate: f64,
    playing: bool,
    muted: bool,
    volume: f64,
    last_update: std::time::Instant,
}

impl ClockSink {
    pub fn new() -> Self {
        Self {
            inner: std::sync::Mutex::new(ClockState {
                position: 0.0,
                rate: 1.0,
                playing: false,
                muted: false,
                volume: 1.0,
                last_update: std::time::Instant::now(),
            }),
        }
    }

    pub fn muted(&self) -> bool {
        self.inner.lock().unwrap().muted
    }

    pub fn volume(&self) -> f64 {
        self.inner.lock().unwrap().volume
    }

    /// Fold elapsed wall time into the position
    fn advance(state: &mut ClockState) {
        let now = std::time::Instant::now();
        if state.playing {
            state.position += now.duration_since(state.last_update).as_secs_f64() * state.rate;
        }
        state.last_update = now;
    }
}

impl Default for ClockSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayableSink for ClockSink {
    fn current_time(&self) -> f64 {
        let mut state = self.inner.lock().unwrap();
        Self::advance(&mut state);
        state.position
    }

    fn set_current_time(&self, secs: f64) {
        let mut state = self.inner.lock().unwrap();
        Self::advance(&mut state);
        state.position = secs.max(0.0);
    }

    fn set_playback_rate(&self, rate: f64) {
        let mut state = self.inner.lock().unwrap();
        Self::advance(&mut state);
        state.rate = rate;
    }

    fn set_muted(&self, muted: bool) {
        self.inner.lock().unwrap().muted = muted;
    }

    fn set_volume(&self, volume: f64) {
        self.inner.lock().unwrap().volume = volume;
    }

    async fn play(&self) -> std::result::Result<(), PlayRejected> {
        let mut state = self.inner.lock().unwrap();
        Self::advance(&mut state);
        state.playing = true;
        Ok(())
    }

    fn pause(&self) {
        let mut state = self.inner.lock().unwrap();
        Self::advance(&mut state);
        state.playing = false;
    }
}

/// Loader binding every URL to a fresh [`ClockSink`]
pub struct ClockSinkLoader;

#[async_trait]
impl SourceLoader for ClockSinkLoader {
    async fn bind(&self, _url: &str) -> Result<Arc<dyn PlayableSink>> {
        Ok(Arc::new(ClockSink::new()) as Arc<dyn PlayableSink>)
    }
}
