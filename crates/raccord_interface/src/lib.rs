//! Collaborator traits for the Raccord continuity engine.
//!
//! This crate defines the seams between the engine core and its external
//! collaborators: the AI anchor-extraction service and the telemetry store
//! that persists continuity state across runs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{AnchorExtractor, TelemetryStore};
pub use types::StoryAnalysis;
