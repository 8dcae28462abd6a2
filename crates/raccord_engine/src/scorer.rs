//! Aggregate continuity scoring.

use raccord_core::{ContinuityAnchor, Scene, SceneValidationResult};
use tracing::debug;

/// Weight of the average validation confidence component.
const CONFIDENCE_WEIGHT: f64 = 40.0;
/// Weight of the character-tracking coverage component.
const COVERAGE_WEIGHT: f64 = 30.0;
/// Ceiling of the issue-severity penalty component.
const ISSUE_COMPONENT_MAX: f64 = 20.0;
/// Penalty per validation issue.
const ISSUE_PENALTY: f64 = 2.0;
/// Prop-consistency component when consecutive scenes share a prop.
const PROP_COMPONENT_SHARED: f64 = 10.0;
/// Prop-consistency component otherwise.
const PROP_COMPONENT_BASE: f64 = 5.0;

/// Reduce validation, anchor, and scene data to one `[0, 100]` score.
#[tracing::instrument(skip_all, fields(scene_count = scenes.len()))]
pub fn score_run(
    scenes: &[Scene],
    anchors: &[ContinuityAnchor],
    validations: &[SceneValidationResult],
) -> f64 {
    let confidence_component = average_confidence(validations) * CONFIDENCE_WEIGHT;
    let coverage_component = character_coverage(scenes, anchors) * COVERAGE_WEIGHT;

    let total_issues: usize = validations.iter().map(|v| v.issues().len()).sum();
    let issue_component =
        ISSUE_COMPONENT_MAX - (ISSUE_PENALTY * total_issues as f64).min(ISSUE_COMPONENT_MAX);

    let prop_component = if any_shared_prop(scenes) {
        PROP_COMPONENT_SHARED
    } else {
        PROP_COMPONENT_BASE
    };

    let score = (confidence_component + coverage_component + issue_component + prop_component)
        .clamp(0.0, 100.0);
    debug!(
        confidence_component,
        coverage_component, issue_component, prop_component, score, "Scored run"
    );
    score
}

fn average_confidence(validations: &[SceneValidationResult]) -> f64 {
    if validations.is_empty() {
        return 0.0;
    }
    let sum: f64 = validations.iter().map(|v| *v.confidence()).sum();
    sum / validations.len() as f64
}

/// Fraction of scenes containing at least one anchored character, capped at 1.
fn character_coverage(scenes: &[Scene], anchors: &[ContinuityAnchor]) -> f64 {
    if scenes.is_empty() {
        return 0.0;
    }
    let tracked = scenes
        .iter()
        .filter(|scene| {
            anchors
                .iter()
                .any(|anchor| scene.has_character(anchor.character_name()))
        })
        .count();
    (tracked as f64 / scenes.len() as f64).min(1.0)
}

/// Whether some prop appears in two consecutive scenes.
fn any_shared_prop(scenes: &[Scene]) -> bool {
    scenes.windows(2).any(|pair| {
        pair[0]
            .props()
            .iter()
            .any(|prop| pair[1].has_prop(prop))
    })
}
