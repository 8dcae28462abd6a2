//! End-to-end tests for the continuity engine pipeline.

use async_trait::async_trait;
use raccord_core::{ContinuityAnchor, ContinuityState, IssueType, ManifestationScore, SceneSeed};
use raccord_engine::{CancelToken, ContinuityEngine, EngineConfig, EngineInput};
use raccord_error::{RaccordResult, StorageError, StorageErrorKind};
use raccord_interface::{AnchorExtractor, TelemetryStore};
use raccord_storage::MemoryTelemetryStore;
use std::collections::BTreeMap;
use std::sync::Arc;

const TWO_SCENE_STORY: &str = "INT. COFFEE SHOP - DAY\n\
    Cole enters wearing a brown coat, carrying a red notebook.\n\
    \n\
    INT. POLICE STATION - NIGHT\n\
    Cole reviews evidence. His notebook is gone.";

/// Mock extraction collaborator that returns a fixed anchor set.
struct MockExtractor {
    anchors: Vec<ContinuityAnchor>,
}

impl MockExtractor {
    fn new(anchors: Vec<ContinuityAnchor>) -> Self {
        Self { anchors }
    }
}

#[async_trait]
impl AnchorExtractor for MockExtractor {
    async fn extract(&self, _story: &str) -> RaccordResult<Vec<ContinuityAnchor>> {
        Ok(self.anchors.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Store whose terminal save always fails.
struct BrokenSaveStore;

#[async_trait]
impl TelemetryStore for BrokenSaveStore {
    async fn save_state(&self, _state: &ContinuityState) -> RaccordResult<()> {
        Err(StorageError::new(StorageErrorKind::Unavailable(
            "disk full".to_string(),
        )))?
    }

    async fn load_state(&self) -> RaccordResult<Option<ContinuityState>> {
        Ok(None)
    }

    async fn record_manifestation(&self, _element: &str, _appeared: bool) -> RaccordResult<()> {
        Ok(())
    }

    async fn load_manifestation_scores(
        &self,
    ) -> RaccordResult<BTreeMap<String, ManifestationScore>> {
        Ok(BTreeMap::new())
    }

    async fn clear(&self) -> RaccordResult<()> {
        Ok(())
    }
}

fn seed(location: &str, characters: &[&str], props: &[&str], text: &str, tone: &str) -> SceneSeed {
    SceneSeed::builder()
        .location(location)
        .characters(characters.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        .props(props.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        .text(text)
        .tone(tone)
        .build()
        .unwrap()
}

#[tokio::test]
async fn disappearing_prop_is_flagged_with_compound_confidence() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let engine = ContinuityEngine::new(store);

    let segments = vec![
        seed(
            "coffee shop",
            &["Cole"],
            &["red notebook"],
            "Cole enters wearing a brown coat, carrying a red notebook.",
            "neutral",
        ),
        seed(
            "police station",
            &["Cole"],
            &[],
            "Cole reviews evidence. His notebook is gone.",
            "neutral",
        ),
    ];
    let input = EngineInput::builder()
        .story(TWO_SCENE_STORY)
        .segments(segments)
        .build()
        .unwrap();

    let output = engine.run(input).await.unwrap();

    let second = &output.validations()[1];
    assert!(second
        .issues()
        .iter()
        .any(|i| *i.issue_type() == IssueType::PropDisappeared
            && i.description().contains("red notebook")));
    assert!(*second.confidence() <= 0.7);
}

#[tokio::test]
async fn vanished_character_fails_validation_in_same_location() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let engine = ContinuityEngine::new(store);

    let segments = vec![
        seed("warehouse", &["Cole"], &[], "Cole inspects the crates.", "neutral"),
        seed("warehouse", &[], &[], "The crates sit unattended.", "neutral"),
    ];
    let input = EngineInput::builder()
        .story("Cole inspects the crates. Later they sit unattended.")
        .segments(segments)
        .build()
        .unwrap();

    let output = engine.run(input).await.unwrap();

    let second = &output.validations()[1];
    assert!(second
        .issues()
        .iter()
        .any(|i| *i.issue_type() == IssueType::CharacterVanished));
    assert!(*second.confidence() <= 0.5);
    assert!(!second.passed());
    assert!(second.requires_human_review());
}

#[tokio::test]
async fn first_scene_always_passes_clean() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let engine = ContinuityEngine::new(store);

    let input = EngineInput::builder()
        .story("Marla waits under the awning as rain hammers the street.")
        .build()
        .unwrap();
    let output = engine.run(input).await.unwrap();

    assert_eq!(output.validations().len(), 1);
    let first = &output.validations()[0];
    assert_eq!(*first.confidence(), 1.0);
    assert!(first.passed());
    assert!(first.issues().is_empty());
}

#[tokio::test]
async fn ai_extractor_wins_over_fallbacks() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let anchors = vec![
        ContinuityAnchor::new("mock-0", "Cole")
            .with_visual_description("mid-40s detective")
            .with_scene_references(vec![1]),
    ];
    let engine = ContinuityEngine::new(store).with_extractor(Box::new(MockExtractor::new(anchors)));

    let input = EngineInput::builder()
        .story("Cole and Marla argue in the stairwell.")
        .build()
        .unwrap();
    let output = engine.run(input).await.unwrap();

    assert_eq!(output.anchors().len(), 1);
    assert_eq!(output.anchors()[0].character_name(), "Cole");
    assert_eq!(
        output.anchors()[0].visual_description(),
        "mid-40s detective"
    );
}

#[tokio::test]
async fn out_of_range_anchor_references_are_sanitized() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let anchors = vec![
        ContinuityAnchor::new("mock-0", "Cole").with_scene_references(vec![1, 5, 12]),
    ];
    let engine = ContinuityEngine::new(store).with_extractor(Box::new(MockExtractor::new(anchors)));

    let input = EngineInput::builder()
        .story("Cole alone in a single scene.")
        .build()
        .unwrap();
    let output = engine.run(input).await.unwrap();

    assert_eq!(output.anchors()[0].scene_references(), &[1]);
}

#[tokio::test]
async fn weak_telemetry_produces_boosts_and_recommendations() {
    let store = Arc::new(MemoryTelemetryStore::new());
    // Seed history: the notebook rarely manifests.
    for appeared in [true, false, false, false, false, false, false, false, false, false] {
        store
            .record_manifestation("red notebook", appeared)
            .await
            .unwrap();
    }

    let engine = ContinuityEngine::new(Arc::clone(&store) as Arc<dyn TelemetryStore>);
    let segments = vec![
        seed(
            "study",
            &["Cole"],
            &["red notebook"],
            "The red notebook lies open on the desk.",
            "calm",
        ),
        seed(
            "study",
            &["Cole"],
            &["red notebook"],
            "Cole flips through the red notebook.",
            "calm",
        ),
    ];
    let input = EngineInput::builder()
        .story("A quiet study scene.")
        .segments(segments)
        .build()
        .unwrap();

    let output = engine.run(input).await.unwrap();

    // Both segments carry a visibility boost for the weak prop.
    for segment in output.segments() {
        assert!(segment.enhanced_text().contains("clearly visible"));
        assert!(segment.manifestation_boosts().contains_key("red notebook"));
    }

    // The telemetry report calls the notebook out as a low performer.
    assert!(output.telemetry().low_performers().contains_key("red notebook"));
    assert!(output
        .production_notes()
        .contains("'red notebook' manifests in only 10% of attempts"));
}

#[tokio::test]
async fn completed_run_persists_state_atomically() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let engine = ContinuityEngine::new(Arc::clone(&store) as Arc<dyn TelemetryStore>);

    let segments = vec![
        seed("bar", &["Cole"], &["glass"], "Cole nurses a drink.", "calm"),
        seed("bar", &["Cole"], &["glass"], "Cole sets the glass down.", "calm"),
    ];
    let input = EngineInput::builder()
        .story("Two quiet shots in a bar.")
        .segments(segments)
        .build()
        .unwrap();

    engine.run(input).await.unwrap();

    let state = store.load_state().await.unwrap().expect("state persisted");
    assert_eq!(state.scene_states().len(), 2);
    assert_eq!(state.scene_states()[0].location(), "bar");
}

#[tokio::test]
async fn cancelled_run_persists_nothing() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let engine = ContinuityEngine::new(Arc::clone(&store) as Arc<dyn TelemetryStore>);

    let cancel = CancelToken::new();
    cancel.cancel();

    let input = EngineInput::builder().story("Doesn't matter.").build().unwrap();
    let result = engine.run_with_cancel(input, cancel).await;

    assert!(result.is_err());
    assert!(store.load_state().await.unwrap().is_none());
}

#[tokio::test]
async fn failed_terminal_persist_fails_the_run() {
    let engine = ContinuityEngine::new(Arc::new(BrokenSaveStore));

    let input = EngineInput::builder()
        .story("Cole walks into the rain.")
        .build()
        .unwrap();
    let result = engine.run(input).await;

    let err = result.expect_err("persist failure must fail the run");
    assert!(format!("{err}").contains("persist"));
}

#[tokio::test]
async fn empty_story_degrades_but_completes() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let engine = ContinuityEngine::new(store);

    let input = EngineInput::builder().story("").build().unwrap();
    let output = engine.run(input).await.unwrap();

    assert_eq!(output.validations().len(), 1);
    assert!(output.anchors().is_empty());
    assert!(*output.score() >= 0.0 && *output.score() <= 100.0);
    assert!(!output.production_notes().is_empty());
}

#[tokio::test]
async fn run_metadata_covers_all_phases() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let engine = ContinuityEngine::new(store);

    let input = EngineInput::builder()
        .story("Cole watches the harbor at dawn.")
        .build()
        .unwrap();
    let output = engine.run(input).await.unwrap();

    let timings = output.metadata().phase_timings_ms();
    for phase in [
        "Extraction",
        "ScenePreparation",
        "TelemetryLoad",
        "Validation",
        "Enhancement",
        "Scoring",
        "TelemetryAnalysis",
        "ProductionNotes",
        "Persistence",
    ] {
        assert!(timings.contains_key(phase), "missing timing for {phase}");
    }
    assert_eq!(*output.metadata().scene_count(), 1);
}

#[tokio::test]
async fn screenplay_segmentation_feeds_the_engine() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let engine = ContinuityEngine::new(store);

    let segments = raccord_engine::segment_screenplay(TWO_SCENE_STORY);
    let input = EngineInput::builder()
        .story(TWO_SCENE_STORY)
        .segments(segments)
        .build()
        .unwrap();

    let output = engine.run(input).await.unwrap();

    assert_eq!(output.validations().len(), 2);
    assert!(output.validations()[1]
        .issues()
        .iter()
        .any(|i| *i.issue_type() == IssueType::PropDisappeared));
}

#[tokio::test]
async fn custom_config_tightens_report_limits() {
    let store = Arc::new(MemoryTelemetryStore::new());
    let config = EngineConfig::builder().report_anchor_limit(1).build();
    let anchors = vec![
        ContinuityAnchor::new("mock-0", "Cole"),
        ContinuityAnchor::new("mock-1", "Marla"),
        ContinuityAnchor::new("mock-2", "Dana"),
    ];
    let engine = ContinuityEngine::new(store)
        .with_extractor(Box::new(MockExtractor::new(anchors)))
        .with_config(config);

    let input = EngineInput::builder()
        .story("Cole, Marla, and Dana cross paths.")
        .build()
        .unwrap();
    let output = engine.run(input).await.unwrap();

    assert!(output.production_notes().contains("…and 2 more"));
}
