//! Enhanced prompt segments produced by the adaptive enhancer.

use crate::Scene;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scene's prompt text after telemetry-aware rewriting.
///
/// `enhanced_text` is the sole artifact the downstream prompt-packaging
/// stage consumes; the hints and boosts exist for reporting and debugging.
///
/// # Examples
///
/// ```
/// use raccord_core::{EnhancedSegment, Scene};
///
/// let scene = Scene::new(1, "alley", vec![], vec![], "A dark alley.", "neutral");
/// let segment = EnhancedSegment::unchanged(scene);
/// assert_eq!(segment.enhanced_text(), "A dark alley.");
/// assert!(segment.continuity_hints().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct EnhancedSegment {
    /// The scene this segment was derived from
    scene: Scene,
    /// The rewritten prompt text
    enhanced_text: String,
    /// Continuity cues appended to the base text
    continuity_hints: Vec<String>,
    /// Boost weight per low-manifestation element, ordered for determinism
    manifestation_boosts: BTreeMap<String, f64>,
}

impl EnhancedSegment {
    /// Create an enhanced segment.
    pub fn new(
        scene: Scene,
        enhanced_text: impl Into<String>,
        continuity_hints: Vec<String>,
        manifestation_boosts: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            scene,
            enhanced_text: enhanced_text.into(),
            continuity_hints,
            manifestation_boosts,
        }
    }

    /// A segment whose text passed through unmodified.
    pub fn unchanged(scene: Scene) -> Self {
        let text = scene.text().to_string();
        Self::new(scene, text, Vec::new(), BTreeMap::new())
    }
}
