//! The engine output bundle and run metadata.

use crate::{ContinuityAnchor, EnhancedSegment, SceneValidationResult, TelemetryReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Timings and counts describing one engine run.
///
/// # Examples
///
/// ```
/// use raccord_core::RunMetadata;
///
/// let mut metadata = RunMetadata::new();
/// metadata.record_phase("Validation", 12);
/// assert_eq!(metadata.phase_timings_ms().get("Validation"), Some(&12));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RunMetadata {
    /// Unique id for this run
    run_id: Uuid,
    /// Version of the engine that produced the output
    engine_version: String,
    /// Milliseconds spent per phase, in phase-name order
    phase_timings_ms: BTreeMap<String, u64>,
    /// Number of prepared scenes
    scene_count: usize,
    /// Number of extracted anchors
    anchor_count: usize,
    /// Total validation issues across all scenes
    issue_count: usize,
}

impl RunMetadata {
    /// Create metadata with a fresh run id and zeroed counts.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            phase_timings_ms: BTreeMap::new(),
            scene_count: 0,
            anchor_count: 0,
            issue_count: 0,
        }
    }

    /// Record how long a phase took.
    pub fn record_phase(&mut self, phase: impl Into<String>, elapsed_ms: u64) {
        self.phase_timings_ms.insert(phase.into(), elapsed_ms);
    }

    /// Set the prepared-scene count.
    pub fn set_scene_count(&mut self, count: usize) {
        self.scene_count = count;
    }

    /// Set the extracted-anchor count.
    pub fn set_anchor_count(&mut self, count: usize) {
        self.anchor_count = count;
    }

    /// Set the total issue count.
    pub fn set_issue_count(&mut self, count: usize) {
        self.issue_count = count;
    }
}

impl Default for RunMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a completed engine run produces.
///
/// Downstream consumers read `segments[i].enhanced_text()` for prompt
/// packaging and `production_notes` for human review; the rest exists for
/// callers that want structured access to the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct EngineOutput {
    /// Extracted continuity anchors
    anchors: Vec<ContinuityAnchor>,
    /// Per-scene validation verdicts
    validations: Vec<SceneValidationResult>,
    /// Aggregate continuity score in `[0, 100]`
    score: f64,
    /// Telemetry-aware rewritten segments, one per scene
    segments: Vec<EnhancedSegment>,
    /// Aggregate telemetry summary
    telemetry: TelemetryReport,
    /// Markdown production notes for human review
    production_notes: String,
    /// Run timings and counts
    metadata: RunMetadata,
}

impl EngineOutput {
    /// Assemble an output bundle; the score is clamped to `[0, 100]`.
    pub fn new(
        anchors: Vec<ContinuityAnchor>,
        validations: Vec<SceneValidationResult>,
        score: f64,
        segments: Vec<EnhancedSegment>,
        telemetry: TelemetryReport,
        production_notes: impl Into<String>,
        metadata: RunMetadata,
    ) -> Self {
        Self {
            anchors,
            validations,
            score: score.clamp(0.0, 100.0),
            segments,
            telemetry,
            production_notes: production_notes.into(),
            metadata,
        }
    }
}
