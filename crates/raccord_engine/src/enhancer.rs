//! Telemetry-aware prompt enhancement.
//!
//! The enhancer rewrites each scene's prompt text to compensate for
//! elements with weak manifestation rates and to carry continuity cues
//! between consecutive scenes. It always produces output; with empty
//! telemetry the base text passes through with no boosts.

use raccord_core::{DEFAULT_MANIFESTATION_RATE, EnhancedSegment, ManifestationScore, Scene};
use std::collections::BTreeMap;
use tracing::debug;

/// Elements with a manifestation rate below this get a visibility cue.
const BOOST_THRESHOLD: f64 = 0.5;

/// Produce one enhanced segment per scene.
#[tracing::instrument(skip_all, fields(scene_count = scenes.len(), tracked = scores.len()))]
pub fn enhance_scenes(
    scenes: &[Scene],
    scores: &BTreeMap<String, ManifestationScore>,
) -> Vec<EnhancedSegment> {
    let mut segments = Vec::with_capacity(scenes.len());
    for (index, scene) in scenes.iter().enumerate() {
        let prev = index.checked_sub(1).map(|i| &scenes[i]);
        segments.push(enhance_scene(scene, prev, scores));
    }
    segments
}

fn enhance_scene(
    scene: &Scene,
    prev: Option<&Scene>,
    scores: &BTreeMap<String, ManifestationScore>,
) -> EnhancedSegment {
    let mut hints = Vec::new();
    let mut boosts = BTreeMap::new();

    // Visibility cues for props with observed weak manifestation.
    for prop in scene.props() {
        let rate = scores
            .get(prop)
            .map(ManifestationScore::rate)
            .unwrap_or(DEFAULT_MANIFESTATION_RATE);
        if rate < BOOST_THRESHOLD {
            debug!(prop = %prop, rate, "Boosting low-manifestation prop");
            hints.push(format!(
                "The {prop} is clearly visible and prominent in the frame."
            ));
            boosts.insert(prop.clone(), 1.0 - rate);
        }
    }

    if let Some(prev) = prev {
        let shared: Vec<&str> = prev
            .characters()
            .iter()
            .filter(|c| scene.has_character(c))
            .map(String::as_str)
            .collect();
        if !shared.is_empty() {
            hints.push(format!(
                "{} must look identical to the previous shot: same face, same hair, same clothing.",
                shared.join(" and ")
            ));
        }

        if !prev.location().is_empty()
            && prev.location().eq_ignore_ascii_case(scene.location())
        {
            hints.push(format!(
                "Maintain the same lighting and atmosphere as the previous shot in the {}.",
                scene.location()
            ));
        }
    }

    if hints.is_empty() {
        return EnhancedSegment::unchanged(scene.clone());
    }

    let enhanced_text = format!("{} {}", scene.text().trim_end(), hints.join(" "));
    EnhancedSegment::new(scene.clone(), enhanced_text, hints, boosts)
}
