//! Validation results produced by the pairwise scene validator.

use serde::{Deserialize, Serialize};

/// Confidence at or above this threshold passes validation.
pub const PASS_THRESHOLD: f64 = 0.6;

/// The continuity violations the validator can detect.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum IssueType {
    /// A prop present in the previous scene is missing from this one
    PropDisappeared,
    /// A character vanished between scenes sharing a location
    CharacterVanished,
    /// An abrupt shift in emotional register between consecutive scenes
    ToneWhiplash,
    /// Two consecutive scenes claim conflicting locations for an event
    LocationConflict,
    /// A character's costume drifted from their anchor
    CostumeInconsistency,
    /// A prop's presentation drifted from its anchor
    PropInconsistency,
}

/// A single continuity violation found between consecutive scenes.
///
/// # Examples
///
/// ```
/// use raccord_core::{IssueType, ValidationIssue};
///
/// let issue = ValidationIssue::new(
///     IssueType::PropDisappeared,
///     "prop 'red notebook' from scene 1 is missing",
///     0.3,
///     2,
/// );
/// assert_eq!(*issue.severity(), 0.3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ValidationIssue {
    /// The kind of violation
    issue_type: IssueType,
    /// Human-readable description of the violation
    description: String,
    /// Severity in `[0, 1]`
    severity: f64,
    /// 1-based id of the scene the issue was found in
    scene_id: usize,
}

impl ValidationIssue {
    /// Create a new issue; severity is clamped to `[0, 1]`.
    pub fn new(
        issue_type: IssueType,
        description: impl Into<String>,
        severity: f64,
        scene_id: usize,
    ) -> Self {
        Self {
            issue_type,
            description: description.into(),
            severity: severity.clamp(0.0, 1.0),
            scene_id,
        }
    }
}

/// Per-scene validation verdict.
///
/// `passed` and `requires_human_review` are derived from confidence at
/// construction and cannot drift out of sync with it.
///
/// # Examples
///
/// ```
/// use raccord_core::SceneValidationResult;
///
/// let result = SceneValidationResult::new(2, 0.35, vec![]);
/// assert!(!result.passed());
/// assert!(result.requires_human_review());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SceneValidationResult {
    /// 1-based id of the validated scene
    scene_id: usize,
    /// Confidence in `[0, 1]` that continuity held
    confidence: f64,
    /// Whether the scene met the pass threshold
    #[getter(skip)]
    passed: bool,
    /// Violations found in this scene
    issues: Vec<ValidationIssue>,
    /// Whether a human should review this scene before generation
    #[getter(skip)]
    requires_human_review: bool,
}

impl SceneValidationResult {
    /// Create a validation result; confidence is clamped to `[0, 1]` and
    /// the pass/review flags are derived from it.
    pub fn new(scene_id: usize, confidence: f64, issues: Vec<ValidationIssue>) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        let passed = confidence >= PASS_THRESHOLD;
        Self {
            scene_id,
            confidence,
            passed,
            issues,
            requires_human_review: !passed,
        }
    }

    /// A clean pass for a scene with no predecessor.
    pub fn first_scene(scene_id: usize) -> Self {
        Self::new(scene_id, 1.0, Vec::new())
    }

    /// Whether the scene met the pass threshold.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Whether a human should review this scene.
    pub fn requires_human_review(&self) -> bool {
        self.requires_human_review
    }
}
