//! The continuity engine orchestrator.
//!
//! Eight sequential phases, each consuming only the outputs of earlier
//! phases, followed by an atomic state persist. Phases 1-7 degrade and
//! continue rather than failing; only the terminal persist (and
//! cancellation) can fail the run, so callers receive either a complete
//! [`EngineOutput`] or exactly one typed error.

use crate::{
    EngineConfig, analyzer, enhancer, extractor, preparer, report, scorer, validator,
};
use raccord_core::{
    ContinuityAnchor, ContinuityState, EngineOutput, RunMetadata, SceneSeed,
};
use raccord_error::{EngineError, EngineErrorKind, RaccordResult};
use raccord_interface::{AnchorExtractor, StoryAnalysis, TelemetryStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// The engine's phase sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum Phase {
    /// Anchor extraction (triple fallback)
    Extraction,
    /// Scene preparation
    ScenePreparation,
    /// Telemetry load
    TelemetryLoad,
    /// Pairwise validation
    Validation,
    /// Prompt enhancement
    Enhancement,
    /// Aggregate scoring
    Scoring,
    /// Telemetry analysis
    TelemetryAnalysis,
    /// Production-notes rendering
    ProductionNotes,
    /// Terminal state persist
    Persistence,
}

/// Cheap cloneable cancellation signal, checked at phase boundaries only.
///
/// # Examples
///
/// ```
/// use raccord_engine::CancelToken;
///
/// let token = CancelToken::new();
/// assert!(!token.is_cancelled());
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the cancellation signal.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Input to one engine run.
///
/// Only the story text is required; segments, analysis, and pre-extracted
/// anchors are optional collaborator inputs that upgrade the run quality
/// when present.
///
/// # Examples
///
/// ```
/// use raccord_engine::EngineInput;
///
/// let input = EngineInput::builder()
///     .story("Cole walks into the rain.")
///     .build()
///     .unwrap();
/// assert!(input.segments().is_none());
/// ```
#[derive(Debug, Clone, Default, derive_builder::Builder)]
#[builder(setter(into, strip_option), default)]
pub struct EngineInput {
    /// The full story text
    story: String,
    /// Pre-segmented scenes, if the caller has them
    segments: Option<Vec<SceneSeed>>,
    /// Pre-computed story analysis, if available
    analysis: Option<StoryAnalysis>,
    /// Pre-extracted anchors, bypassing the extraction chain
    anchors: Option<Vec<ContinuityAnchor>>,
}

impl EngineInput {
    /// Create a builder for an engine input.
    pub fn builder() -> EngineInputBuilder {
        EngineInputBuilder::default()
    }

    /// The full story text.
    pub fn story(&self) -> &str {
        &self.story
    }

    /// Pre-segmented scenes, if supplied.
    pub fn segments(&self) -> Option<&[SceneSeed]> {
        self.segments.as_deref()
    }

    /// Pre-computed story analysis, if supplied.
    pub fn analysis(&self) -> Option<&StoryAnalysis> {
        self.analysis.as_ref()
    }

    /// Pre-extracted anchors, if supplied.
    pub fn anchors(&self) -> Option<&[ContinuityAnchor]> {
        self.anchors.as_deref()
    }
}

/// The continuity engine.
///
/// Holds the injected telemetry store, the optional AI extraction
/// collaborator, and tuning configuration. One engine value can serve many
/// runs; each run is a single asynchronous unit of work.
pub struct ContinuityEngine {
    store: Arc<dyn TelemetryStore>,
    extractor: Option<Box<dyn AnchorExtractor>>,
    config: EngineConfig,
}

impl ContinuityEngine {
    /// Create an engine over the given store with default configuration.
    pub fn new(store: Arc<dyn TelemetryStore>) -> Self {
        Self {
            store,
            extractor: None,
            config: EngineConfig::default(),
        }
    }

    /// Attach an AI extraction collaborator as the first fallback strategy.
    pub fn with_extractor(mut self, extractor: Box<dyn AnchorExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Replace the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the full pipeline without external cancellation.
    ///
    /// # Errors
    ///
    /// Returns an error only if the terminal state persist fails or an
    /// unanticipated failure escapes a phase.
    pub async fn run(&self, input: EngineInput) -> RaccordResult<EngineOutput> {
        self.run_with_cancel(input, CancelToken::new()).await
    }

    /// Run the full pipeline, checking `cancel` at every phase boundary.
    ///
    /// A cancelled run persists nothing and returns a typed error.
    ///
    /// # Errors
    ///
    /// Returns an error if cancellation is raised, the terminal state
    /// persist fails, or an unanticipated failure escapes a phase.
    #[tracing::instrument(skip_all, fields(story_len = input.story().len()))]
    pub async fn run_with_cancel(
        &self,
        input: EngineInput,
        cancel: CancelToken,
    ) -> RaccordResult<EngineOutput> {
        let mut metadata = RunMetadata::new();
        let EngineInput {
            story,
            segments,
            analysis,
            anchors: provided_anchors,
        } = input;

        // Phase 1: anchor extraction.
        checkpoint(&cancel, Phase::Extraction)?;
        let started = Instant::now();
        let (mut anchors, strategy) = match provided_anchors {
            Some(anchors) if !anchors.is_empty() => (anchors, "provided"),
            _ => {
                extractor::extract_anchors(
                    &story,
                    self.extractor.as_deref(),
                    analysis.as_ref(),
                    &self.config,
                )
                .await
            }
        };
        debug!(strategy, anchor_count = anchors.len(), "Extraction complete");
        record_phase(&mut metadata, Phase::Extraction, started);

        // Phase 2: scene preparation.
        checkpoint(&cancel, Phase::ScenePreparation)?;
        let started = Instant::now();
        let scenes = preparer::prepare_scenes(&story, segments, &anchors);
        for anchor in &mut anchors {
            anchor.sanitize_references(scenes.len());
        }
        record_phase(&mut metadata, Phase::ScenePreparation, started);

        // Phase 3: telemetry load. A failed load degrades to empty history.
        checkpoint(&cancel, Phase::TelemetryLoad)?;
        let started = Instant::now();
        let scores = match self.store.load_manifestation_scores().await {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, "Telemetry load failed; continuing with empty history");
                Default::default()
            }
        };
        match self.store.load_state().await {
            Ok(Some(previous)) => debug!(
                previous_scenes = previous.scene_states().len(),
                "Loaded prior continuity state"
            ),
            Ok(None) => debug!("No prior continuity state"),
            Err(e) => warn!(error = %e, "Prior state unreadable; continuing"),
        }
        record_phase(&mut metadata, Phase::TelemetryLoad, started);

        // Phase 4: validation.
        checkpoint(&cancel, Phase::Validation)?;
        let started = Instant::now();
        let validations = validator::validate_scenes(&scenes, &anchors);
        record_phase(&mut metadata, Phase::Validation, started);

        // Phase 5: enhancement.
        checkpoint(&cancel, Phase::Enhancement)?;
        let started = Instant::now();
        let segments = enhancer::enhance_scenes(&scenes, &scores);
        record_phase(&mut metadata, Phase::Enhancement, started);

        // Phase 6: scoring.
        checkpoint(&cancel, Phase::Scoring)?;
        let started = Instant::now();
        let score = scorer::score_run(&scenes, &anchors, &validations);
        record_phase(&mut metadata, Phase::Scoring, started);

        // Phase 7: telemetry analysis.
        checkpoint(&cancel, Phase::TelemetryAnalysis)?;
        let started = Instant::now();
        let enriched = analyzer::analyze_scores(&scores);
        let telemetry = analyzer::build_report(&enriched);
        record_phase(&mut metadata, Phase::TelemetryAnalysis, started);

        // Phase 8: production notes.
        checkpoint(&cancel, Phase::ProductionNotes)?;
        let started = Instant::now();
        let notes =
            report::render_production_notes(score, &anchors, &validations, &telemetry, &self.config);
        record_phase(&mut metadata, Phase::ProductionNotes, started);

        // Terminal persist: the one step that fails the run, since a
        // missing state poisons continuity for every future run.
        checkpoint(&cancel, Phase::Persistence)?;
        let started = Instant::now();
        let state = ContinuityState::from_run(&scenes, scores);
        self.store.save_state(&state).await.map_err(|e| {
            EngineError::new(EngineErrorKind::StatePersist(e.to_string()))
        })?;
        record_phase(&mut metadata, Phase::Persistence, started);

        metadata.set_scene_count(scenes.len());
        metadata.set_anchor_count(anchors.len());
        metadata.set_issue_count(validations.iter().map(|v| v.issues().len()).sum());

        info!(
            score,
            scenes = scenes.len(),
            anchors = anchors.len(),
            "Continuity run completed"
        );

        Ok(EngineOutput::new(
            anchors,
            validations,
            score,
            segments,
            telemetry,
            notes,
            metadata,
        ))
    }
}

fn checkpoint(cancel: &CancelToken, phase: Phase) -> RaccordResult<()> {
    if cancel.is_cancelled() {
        warn!(%phase, "Run cancelled at phase boundary");
        Err(EngineError::new(EngineErrorKind::Cancelled(
            phase.to_string(),
        )))?;
    }
    Ok(())
}

fn record_phase(metadata: &mut RunMetadata, phase: Phase, started: Instant) {
    metadata.record_phase(phase.to_string(), started.elapsed().as_millis() as u64);
}
