//! Story execution command handler.

use crate::cli::commands::default_state_dir;
use raccord_engine::{ContinuityEngine, EngineConfig, EngineInput, segment_screenplay};
use raccord_error::{ConfigError, RaccordResult};
use raccord_interface::TelemetryStore;
use raccord_storage::{JsonFileTelemetryStore, MemoryTelemetryStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Run a story file through the continuity pipeline and print the notes.
pub async fn run_story(
    story_path: &Path,
    segment: bool,
    state_dir: Option<PathBuf>,
    ephemeral: bool,
    config_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> RaccordResult<()> {
    let story = std::fs::read_to_string(story_path).map_err(|e| {
        ConfigError::new(format!("Failed to read {}: {}", story_path.display(), e))
    })?;

    let config = match config_path {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let store: Arc<dyn TelemetryStore> = if ephemeral {
        Arc::new(MemoryTelemetryStore::new())
    } else {
        let dir = state_dir.unwrap_or_else(default_state_dir);
        Arc::new(JsonFileTelemetryStore::new(dir)?)
    };

    let engine = ContinuityEngine::new(store).with_config(config);

    let mut input_builder = EngineInput::builder();
    input_builder.story(story.clone());
    if segment {
        let segments = segment_screenplay(&story);
        info!(scene_count = segments.len(), "Segmented screenplay");
        input_builder.segments(segments);
    }
    let input = input_builder
        .build()
        .map_err(|e| ConfigError::new(format!("Failed to build engine input: {e}")))?;

    let output = engine.run(input).await?;

    info!(
        score = output.score(),
        scenes = output.metadata().scene_count(),
        anchors = output.metadata().anchor_count(),
        issues = output.metadata().issue_count(),
        "Run complete"
    );

    if let Some(path) = output_path {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| ConfigError::new(format!("Failed to serialize output: {e}")))?;
        std::fs::write(&path, json).map_err(|e| {
            ConfigError::new(format!("Failed to write {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Wrote engine output");
    }

    println!("{}", output.production_notes());
    Ok(())
}
