//! Raccord - Continuity Engine for AI-Generated Video
//!
//! Raccord analyzes a sequence of narrative scene descriptions and keeps
//! independently generated video clips visually and narratively
//! consistent. It extracts recurring characters and props, validates
//! scene-to-scene continuity, learns which descriptive elements reliably
//! manifest in generated output, rewrites prompts to compensate for weak
//! elements, and produces a numeric quality score plus markdown
//! production notes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use raccord::{ContinuityEngine, EngineInput, MemoryTelemetryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryTelemetryStore::new());
//!     let engine = ContinuityEngine::new(store);
//!
//!     let input = EngineInput::builder()
//!         .story("INT. COFFEE SHOP - DAY\nCole enters, carrying a red notebook.")
//!         .build()?;
//!
//!     let output = engine.run(input).await?;
//!     println!("{}", output.production_notes());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Raccord is organized as a workspace with focused crates:
//!
//! - `raccord_error` - Error types
//! - `raccord_core` - Core data types (Scene, ContinuityAnchor, etc.)
//! - `raccord_interface` - Collaborator traits (AnchorExtractor, TelemetryStore)
//! - `raccord_storage` - Telemetry store implementations
//! - `raccord_engine` - The 8-phase continuity pipeline
//!
//! This crate (`raccord`) re-exports everything for convenience and ships
//! the `raccord` CLI binary.

#![forbid(unsafe_code)]

mod observability;

pub use observability::{
    ObservabilityConfig, init_observability, init_observability_with_config,
    shutdown_observability,
};
pub use raccord_core::{
    ContinuityAnchor, ContinuityState, DEFAULT_MANIFESTATION_RATE, ElementCategory,
    EnhancedManifestationScore, EnhancedSegment, EngineOutput, EnhancementStrategy, IssueType,
    ManifestationScore, PASS_THRESHOLD, RunMetadata, Scene, SceneSeed, SceneSnapshot,
    SceneValidationResult, TelemetryReport, Trend, ValidationIssue,
};
pub use raccord_engine::{
    CancelToken, ContinuityEngine, EngineConfig, EngineInput, Phase, TelemetryActor,
    TelemetryMessage, analyze_scores, build_report, enhance_scenes, extract_anchors,
    prepare_scenes, record_outcome, render_production_notes, score_run, segment_screenplay,
    snapshot_scores, validate_scenes,
};
pub use raccord_error::{
    ConfigError, EngineError, EngineErrorKind, ExtractionError, ExtractionErrorKind, JsonError,
    RaccordError, RaccordErrorKind, RaccordResult, StorageError, StorageErrorKind,
};
pub use raccord_interface::{AnchorExtractor, StoryAnalysis, TelemetryStore};
pub use raccord_storage::{JsonFileTelemetryStore, MemoryTelemetryStore};
