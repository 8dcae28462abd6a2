//! Engine configuration types and loading.

use raccord_error::{ConfigError, RaccordResult};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use typed_builder::TypedBuilder;

/// Engine tuning knobs with sensible defaults.
///
/// The validator and analyzer constants (penalty factors, tone threshold,
/// trend baseline) are deliberately NOT configurable; they are calibrated
/// values pending product review and live as named constants next to the
/// code that applies them.
///
/// # Examples
///
/// ```
/// use raccord_engine::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .extraction_timeout_secs(5)
///     .build();
/// assert_eq!(*config.extraction_timeout_secs(), 5);
/// assert_eq!(*config.heuristic_name_cap(), 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Getters, TypedBuilder)]
pub struct EngineConfig {
    /// Deadline for the AI extraction collaborator before the fallback
    /// chain moves on.
    #[builder(default = 20)]
    #[serde(default = "default_extraction_timeout_secs")]
    extraction_timeout_secs: u64,

    /// Maximum candidate names the heuristic extractor keeps.
    #[builder(default = 10)]
    #[serde(default = "default_heuristic_name_cap")]
    heuristic_name_cap: usize,

    /// State directory for durable stores (None means caller-provided).
    #[builder(default)]
    #[serde(default)]
    state_dir: Option<PathBuf>,

    /// Maximum anchors listed in production notes.
    #[builder(default = 10)]
    #[serde(default = "default_report_anchor_limit")]
    report_anchor_limit: usize,

    /// Maximum failed scenes detailed in production notes.
    #[builder(default = 5)]
    #[serde(default = "default_report_failed_scene_limit")]
    report_failed_scene_limit: usize,
}

fn default_extraction_timeout_secs() -> u64 {
    20
}

fn default_heuristic_name_cap() -> usize {
    10
}

fn default_report_anchor_limit() -> usize {
    10
}

fn default_report_failed_scene_limit() -> usize {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            extraction_timeout_secs: default_extraction_timeout_secs(),
            heuristic_name_cap: default_heuristic_name_cap(),
            state_dir: None,
            report_anchor_limit: default_report_anchor_limit(),
            report_failed_scene_limit: default_report_failed_scene_limit(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is invalid.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file<P: AsRef<Path>>(path: P) -> RaccordResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::new(format!("Failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let config = EngineConfig::default();
        assert_eq!(*config.extraction_timeout_secs(), 20);
        assert_eq!(*config.heuristic_name_cap(), 10);
        assert_eq!(*config.report_anchor_limit(), 10);
        assert_eq!(*config.report_failed_scene_limit(), 5);
        assert!(config.state_dir().is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str("extraction_timeout_secs = 3").unwrap();
        assert_eq!(*config.extraction_timeout_secs(), 3);
        assert_eq!(*config.heuristic_name_cap(), 10);
    }
}
