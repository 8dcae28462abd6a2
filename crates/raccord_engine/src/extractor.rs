//! Triple-fallback continuity anchor extraction.
//!
//! Strategies run in strict order and the first non-empty result wins:
//!
//! 1. AI-assisted extraction through the [`AnchorExtractor`] collaborator,
//!    bounded by the configured timeout; errors and empty results fall
//!    through without surfacing.
//! 2. Analysis-based extraction from a pre-computed [`StoryAnalysis`].
//! 3. Heuristic extraction from capitalized tokens in the story text.
//!
//! Fallthrough is signaled by an empty result, not by error propagation;
//! this component cannot fail.

use crate::EngineConfig;
use raccord_core::ContinuityAnchor;
use raccord_interface::{AnchorExtractor, StoryAnalysis};
use std::time::Duration;
use tracing::{debug, warn};

/// Extract anchors with best-effort quality, never failing outright.
///
/// Returns the anchors plus the name of the strategy that produced them
/// (for logging and run metadata).
#[tracing::instrument(skip_all, fields(story_len = story.len()))]
pub async fn extract_anchors(
    story: &str,
    extractor: Option<&dyn AnchorExtractor>,
    analysis: Option<&StoryAnalysis>,
    config: &EngineConfig,
) -> (Vec<ContinuityAnchor>, &'static str) {
    if let Some(driver) = extractor {
        let anchors = ai_extraction(story, driver, *config.extraction_timeout_secs()).await;
        if !anchors.is_empty() {
            return (anchors, "ai");
        }
    }

    if let Some(analysis) = analysis {
        let anchors = analysis_extraction(story, analysis);
        if !anchors.is_empty() {
            return (anchors, "analysis");
        }
    }

    (
        heuristic_extraction(story, *config.heuristic_name_cap()),
        "heuristic",
    )
}

/// Strategy 1: delegate to the AI collaborator with a deadline.
async fn ai_extraction(
    story: &str,
    driver: &dyn AnchorExtractor,
    timeout_secs: u64,
) -> Vec<ContinuityAnchor> {
    let deadline = Duration::from_secs(timeout_secs);
    match tokio::time::timeout(deadline, driver.extract(story)).await {
        Ok(Ok(anchors)) => {
            if anchors.is_empty() {
                debug!(
                    provider = driver.provider_name(),
                    "AI extraction returned no anchors, falling through"
                );
            }
            anchors
        }
        Ok(Err(e)) => {
            warn!(
                provider = driver.provider_name(),
                error = %e,
                "AI extraction failed, falling through"
            );
            Vec::new()
        }
        Err(_) => {
            warn!(
                provider = driver.provider_name(),
                timeout_secs,
                "AI extraction timed out, falling through"
            );
            Vec::new()
        }
    }
}

/// Strategy 2: derive one anchor per analyzed character, attributing any
/// analyzed props that literally occur in the story text.
fn analysis_extraction(story: &str, analysis: &StoryAnalysis) -> Vec<ContinuityAnchor> {
    let story_lower = story.to_lowercase();
    analysis
        .characters()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let props: Vec<String> = analysis
                .props()
                .iter()
                .filter(|prop| story_lower.contains(&prop.to_lowercase()))
                .cloned()
                .collect();
            ContinuityAnchor::new(format!("analysis-{index}"), name.clone())
                .with_props(props)
                .with_scene_references(vec![index + 1])
        })
        .collect()
}

/// Strategy 3: minimal anchors from capitalized tokens in the story.
fn heuristic_extraction(story: &str, cap: usize) -> Vec<ContinuityAnchor> {
    heuristic_character_names(story, cap)
        .into_iter()
        .enumerate()
        .map(|(index, name)| ContinuityAnchor::new(format!("heuristic-{index}"), name))
        .collect()
}

/// Candidate character names: whitespace tokens longer than two characters
/// with an uppercase first letter and lowercase remainder, deduplicated in
/// order of first appearance, capped.
pub(crate) fn heuristic_character_names(text: &str, cap: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_alphabetic());
        if !is_name_like(token) {
            continue;
        }
        if names.iter().any(|n| n == token) {
            continue;
        }
        names.push(token.to_string());
        if names.len() >= cap {
            break;
        }
    }
    names
}

fn is_name_like(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {}
        _ => return false,
    }
    token.chars().count() > 2 && chars.all(|c| c.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use raccord_error::{ExtractionError, ExtractionErrorKind, RaccordResult};

    struct FailingExtractor;

    #[async_trait]
    impl AnchorExtractor for FailingExtractor {
        async fn extract(&self, _story: &str) -> RaccordResult<Vec<ContinuityAnchor>> {
            Err(ExtractionError::new(ExtractionErrorKind::Collaborator(
                "boom".to_string(),
            )))?
        }

        fn provider_name(&self) -> &'static str {
            "failing"
        }
    }

    struct SlowExtractor;

    #[async_trait]
    impl AnchorExtractor for SlowExtractor {
        async fn extract(&self, _story: &str) -> RaccordResult<Vec<ContinuityAnchor>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![ContinuityAnchor::new("slow", "Nobody")])
        }

        fn provider_name(&self) -> &'static str {
            "slow"
        }
    }

    #[test]
    fn heuristic_names_follow_shape_rules() {
        let names = heuristic_character_names(
            "Cole met DANA at the docks. Marla waved. Cole nodded. ok",
            10,
        );
        assert_eq!(names, vec!["Cole".to_string(), "Marla".to_string()]);
    }

    #[test]
    fn heuristic_names_respect_cap() {
        let text = "Alpha Bravo Carla Delta Echer Frank Gemma Henry Inska Julio Karla Lomax";
        assert_eq!(heuristic_character_names(text, 10).len(), 10);
    }

    #[test]
    fn analysis_attributes_only_literal_props() {
        let analysis = StoryAnalysis::new(
            vec!["Cole".to_string()],
            vec![],
            vec!["red notebook".to_string(), "revolver".to_string()],
        );
        let anchors =
            analysis_extraction("Cole enters carrying a red notebook.", &analysis);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].props(), &["red notebook".to_string()]);
    }

    #[tokio::test]
    async fn collaborator_failure_falls_through_to_heuristic() {
        let config = EngineConfig::default();
        let (anchors, strategy) = extract_anchors(
            "Cole walks alone.",
            Some(&FailingExtractor),
            None,
            &config,
        )
        .await;
        assert_eq!(strategy, "heuristic");
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].character_name(), "Cole");
    }

    #[tokio::test(start_paused = true)]
    async fn collaborator_timeout_falls_through() {
        let config = EngineConfig::builder().extraction_timeout_secs(1).build();
        let (anchors, strategy) =
            extract_anchors("Cole waits.", Some(&SlowExtractor), None, &config).await;
        assert_eq!(strategy, "heuristic");
        assert_eq!(anchors[0].character_name(), "Cole");
        assert!(!anchors.is_empty());
    }

    #[tokio::test]
    async fn empty_story_yields_empty_anchor_list() {
        let config = EngineConfig::default();
        let (anchors, strategy) = extract_anchors("", None, None, &config).await;
        assert_eq!(strategy, "heuristic");
        assert!(anchors.is_empty());
    }
}
