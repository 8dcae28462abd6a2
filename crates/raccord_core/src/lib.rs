//! Core data types for the Raccord continuity engine.
//!
//! This crate provides the foundation data types shared across the Raccord
//! workspace: scenes, continuity anchors, validation results, enhanced
//! segments, manifestation telemetry, persisted continuity state, and the
//! engine output bundle.
//!
//! All numeric invariants (confidence and manifestation rates in `[0, 1]`,
//! scores in `[0, 100]`) are enforced at construction time, so downstream
//! code never needs to re-clamp.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anchor;
mod enhancement;
mod manifestation;
mod output;
mod scene;
mod state;
mod validation;

pub use anchor::ContinuityAnchor;
pub use enhancement::EnhancedSegment;
pub use manifestation::{
    DEFAULT_MANIFESTATION_RATE, ElementCategory, EnhancedManifestationScore, EnhancementStrategy,
    ManifestationScore, TelemetryReport, Trend,
};
pub use output::{EngineOutput, RunMetadata};
pub use scene::{Scene, SceneSeed, SceneSeedBuilder};
pub use state::{ContinuityState, SceneSnapshot};
pub use validation::{IssueType, PASS_THRESHOLD, SceneValidationResult, ValidationIssue};
