//! Trait definitions for engine collaborators.

use async_trait::async_trait;
use raccord_core::{ContinuityAnchor, ContinuityState, ManifestationScore};
use raccord_error::RaccordResult;
use std::collections::BTreeMap;

/// The AI-assisted anchor extraction collaborator.
///
/// Invoked at most once per run, as the first strategy of the extraction
/// fallback chain. Failures and empty results never surface to engine
/// callers; the chain falls through to analysis-based and heuristic
/// extraction instead.
#[async_trait]
pub trait AnchorExtractor: Send + Sync {
    /// Extract continuity anchors from the full story text.
    async fn extract(&self, story: &str) -> RaccordResult<Vec<ContinuityAnchor>>;

    /// Provider name for logging (e.g., "gemini", "mock").
    fn provider_name(&self) -> &'static str;
}

/// The persistence protocol for continuity state and telemetry counters.
///
/// The store is the one resource shared across concurrent engine runs.
/// Implementations must serialize writes per element so that concurrent
/// `record_manifestation` calls never lose counter updates; loads may
/// return unsynchronized snapshots.
///
/// Two reference implementations ship in `raccord_storage`: an ephemeral
/// in-process store and a durable JSON-file store. Both satisfy identical
/// observable semantics.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Atomically replace the persisted continuity state.
    async fn save_state(&self, state: &ContinuityState) -> RaccordResult<()>;

    /// Load the persisted continuity state, if any exists.
    async fn load_state(&self) -> RaccordResult<Option<ContinuityState>>;

    /// Record one generation outcome for an element, creating the counter
    /// on first sight.
    async fn record_manifestation(&self, element: &str, appeared: bool) -> RaccordResult<()>;

    /// Snapshot the lifetime manifestation counters for all elements.
    async fn load_manifestation_scores(
        &self,
    ) -> RaccordResult<BTreeMap<String, ManifestationScore>>;

    /// Remove all persisted state and counters.
    async fn clear(&self) -> RaccordResult<()>;
}
