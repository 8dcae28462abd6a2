//! Persisted continuity state.
//!
//! `ContinuityState` is the only entity that survives across runs. It is
//! written atomically at the end of a successful run and read back during
//! the telemetry-load phase of the next one.

use crate::{ManifestationScore, Scene};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A compact snapshot of a scene, kept in persisted state.
///
/// Snapshots carry the continuity-relevant fields only; the full prompt
/// text is transient and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SceneSnapshot {
    /// 1-based id the scene held in its run
    id: usize,
    /// Where the scene took place
    location: String,
    /// Characters present
    characters: Vec<String>,
    /// Props present
    props: Vec<String>,
    /// Emotional register
    tone: String,
}

impl From<&Scene> for SceneSnapshot {
    fn from(scene: &Scene) -> Self {
        Self {
            id: *scene.id(),
            location: scene.location().to_string(),
            characters: scene.characters().clone(),
            props: scene.props().clone(),
            tone: scene.tone().to_string(),
        }
    }
}

/// The continuity state persisted across runs.
///
/// # Examples
///
/// ```
/// use raccord_core::ContinuityState;
/// use std::collections::BTreeMap;
///
/// let state = ContinuityState::new(Vec::new(), BTreeMap::new());
/// assert!(state.scene_states().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ContinuityState {
    /// Scene snapshots from the most recent completed run
    scene_states: Vec<SceneSnapshot>,
    /// Lifetime manifestation counters per element
    manifestation_scores: BTreeMap<String, ManifestationScore>,
    /// When this state was persisted
    timestamp: DateTime<Utc>,
}

impl ContinuityState {
    /// Create a state stamped with the current time.
    pub fn new(
        scene_states: Vec<SceneSnapshot>,
        manifestation_scores: BTreeMap<String, ManifestationScore>,
    ) -> Self {
        Self {
            scene_states,
            manifestation_scores,
            timestamp: Utc::now(),
        }
    }

    /// Build a state from the scenes of a completed run plus the current
    /// telemetry counters.
    pub fn from_run(
        scenes: &[Scene],
        manifestation_scores: BTreeMap<String, ManifestationScore>,
    ) -> Self {
        Self::new(
            scenes.iter().map(SceneSnapshot::from).collect(),
            manifestation_scores,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_drops_prompt_text() {
        let scene = Scene::new(
            2,
            "police station",
            vec!["Cole".to_string()],
            vec!["evidence file".to_string()],
            "Cole reviews evidence late into the night.",
            "dramatic",
        );
        let snapshot = SceneSnapshot::from(&scene);
        assert_eq!(*snapshot.id(), 2);
        assert_eq!(snapshot.location(), "police station");
        assert_eq!(snapshot.tone(), "dramatic");
    }

    #[test]
    fn state_round_trips_through_json() {
        let scene = Scene::new(1, "alley", vec![], vec!["knife".to_string()], "t", "calm");
        let mut scores = BTreeMap::new();
        scores.insert(
            "knife".to_string(),
            ManifestationScore::from_counts("knife", 4, 3),
        );
        let state = ContinuityState::from_run(&[scene], scores);

        let json = serde_json::to_string(&state).unwrap();
        let restored: ContinuityState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }
}
