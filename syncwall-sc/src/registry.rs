//! Stream registry
//!
//! Turns the discovery result into an ordered collection of bound
//! sinks, once per session. Insertion order = discovery order =
//! display order; the registry is read-only after bootstrap.

use crate::sink::{enforce_silence, PlayableSink, SourceLoader};
use crate::state::SharedState;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use syncwall_common::events::SyncEvent;

/// One registry slot: a source URL bound to a playable sink
pub struct BoundSink {
    pub sink_id: Uuid,
    /// Immutable once bound
    pub source_url: String,
    pub sink: Arc<dyn PlayableSink>,
}

/// Ordered collection of bound sinks for one session
pub struct StreamRegistry {
    sinks: Vec<BoundSink>,
}

impl StreamRegistry {
    /// Bind each discovered URL to a fresh sink.
    ///
    /// Bind failures are local: the failed slot is absent from the
    /// registry and the remaining URLs still proceed (degraded
    /// session, not a fatal one).
    pub async fn bootstrap(
        loader: &dyn SourceLoader,
        urls: &[String],
        state: &SharedState,
    ) -> Self {
        let mut sinks = Vec::with_capacity(urls.len());

        for url in urls {
            match loader.bind(url).await {
                Ok(sink) => {
                    // Silence invariant is applied at the binding
                    // boundary; the sync engine re-asserts it per pass
                    enforce_silence(sink.as_ref());

                    let sink_id = Uuid::new_v4();
                    info!("Bound stream {} -> sink {}", url, sink_id);
                    state.broadcast_event(SyncEvent::SinkBound {
                        sink_id,
                        source_url: url.clone(),
                        timestamp: chrono::Utc::now(),
                    });

                    sinks.push(BoundSink {
                        sink_id,
                        source_url: url.clone(),
                        sink,
                    });
                }
                Err(e) => {
                    warn!("Failed to bind stream {}: {}", url, e);
                    state.broadcast_event(SyncEvent::SinkBindFailed {
                        source_url: url.clone(),
                        reason: e.to_string(),
                        timestamp: chrono::Utc::now(),
                    });
                }
            }
        }

        info!("Registry bootstrapped: {}/{} streams bound", sinks.len(), urls.len());
        Self { sinks }
    }

    /// Build a registry directly from bound sinks (tests, embedding)
    pub fn from_sinks(sinks: Vec<BoundSink>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundSink> {
        self.sinks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&BoundSink> {
        self.sinks.get(index)
    }

    /// Default master candidate: the first bound sink
    pub fn first(&self) -> Option<&BoundSink> {
        self.sinks.first()
    }
}
