//! In-process telemetry store.

use async_trait::async_trait;
use raccord_core::{ContinuityState, ManifestationScore};
use raccord_error::RaccordResult;
use raccord_interface::TelemetryStore;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryInner {
    state: Option<ContinuityState>,
    scores: BTreeMap<String, ManifestationScore>,
}

/// Ephemeral in-process telemetry store.
///
/// All mutation goes through a single async mutex, which gives the
/// per-element single-writer discipline the protocol requires; reads take
/// the same lock briefly and return owned snapshots.
///
/// # Examples
///
/// ```
/// use raccord_storage::MemoryTelemetryStore;
/// use raccord_interface::TelemetryStore;
///
/// # async fn demo() {
/// let store = MemoryTelemetryStore::new();
/// store.record_manifestation("red notebook", true).await.unwrap();
/// let scores = store.load_manifestation_scores().await.unwrap();
/// assert_eq!(*scores["red notebook"].attempts(), 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryTelemetryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryTelemetryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TelemetryStore for MemoryTelemetryStore {
    async fn save_state(&self, state: &ContinuityState) -> RaccordResult<()> {
        let mut inner = self.inner.lock().await;
        debug!(scenes = state.scene_states().len(), "Saving continuity state");
        inner.state = Some(state.clone());
        Ok(())
    }

    async fn load_state(&self) -> RaccordResult<Option<ContinuityState>> {
        let inner = self.inner.lock().await;
        Ok(inner.state.clone())
    }

    async fn record_manifestation(&self, element: &str, appeared: bool) -> RaccordResult<()> {
        let mut inner = self.inner.lock().await;
        inner
            .scores
            .entry(element.to_string())
            .or_insert_with(|| ManifestationScore::new(element))
            .record(appeared);
        Ok(())
    }

    async fn load_manifestation_scores(
        &self,
    ) -> RaccordResult<BTreeMap<String, ManifestationScore>> {
        let inner = self.inner.lock().await;
        Ok(inner.scores.clone())
    }

    async fn clear(&self) -> RaccordResult<()> {
        let mut inner = self.inner.lock().await;
        debug!("Clearing in-memory telemetry store");
        inner.state = None;
        inner.scores.clear();
        Ok(())
    }
}
