//! Manifestation telemetry: which descriptive elements survive generation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Neutral rate assumed for elements with no recorded attempts.
///
/// New elements start optimistic rather than penalized; the enhancer only
/// boosts elements with observed weak rates.
pub const DEFAULT_MANIFESTATION_RATE: f64 = 0.8;

/// Lifetime attempt/success counters for one descriptive element.
///
/// # Examples
///
/// ```
/// use raccord_core::ManifestationScore;
///
/// let mut score = ManifestationScore::new("sword");
/// assert_eq!(score.rate(), 0.8);
///
/// score.record(false);
/// score.record(true);
/// assert_eq!(score.rate(), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ManifestationScore {
    /// The tracked element name
    element: String,
    /// Times the element was requested in a prompt
    attempts: u64,
    /// Times the element appeared in generated output
    successes: u64,
}

impl ManifestationScore {
    /// Create a fresh score with no history.
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            attempts: 0,
            successes: 0,
        }
    }

    /// Restore a score from persisted counters; successes are capped at
    /// attempts so the rate invariant holds for hand-edited state files.
    pub fn from_counts(element: impl Into<String>, attempts: u64, successes: u64) -> Self {
        Self {
            element: element.into(),
            attempts,
            successes: successes.min(attempts),
        }
    }

    /// Record one generation outcome.
    pub fn record(&mut self, appeared: bool) {
        self.attempts += 1;
        if appeared {
            self.successes += 1;
        }
    }

    /// Fraction of attempts in which the element manifested, in `[0, 1]`.
    ///
    /// Returns [`DEFAULT_MANIFESTATION_RATE`] when no attempts are recorded.
    pub fn rate(&self) -> f64 {
        if self.attempts == 0 {
            DEFAULT_MANIFESTATION_RATE
        } else {
            (self.successes as f64 / self.attempts as f64).clamp(0.0, 1.0)
        }
    }
}

/// Direction of an element's manifestation rate relative to baseline.
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
pub enum Trend {
    /// Rate is meaningfully above baseline
    Improving,
    /// Rate is meaningfully below baseline
    Declining,
    /// Rate is near baseline
    Stable,
    /// Not enough attempts to judge
    Insufficient,
}

/// Inferred category of a tracked element.
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
pub enum ElementCategory {
    /// A named character
    Character,
    /// A physical object
    Prop,
    /// A place
    Location,
    /// A clothing item
    Costume,
    /// A movement or activity
    Action,
    /// Category could not be inferred
    Unknown,
}

/// How the enhancer should compensate for an element's manifestation rate.
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
pub enum EnhancementStrategy {
    /// Append an explicit visibility cue
    Boost,
    /// Reword the element description
    Rephrase,
    /// Add surrounding context
    Context,
    /// Reference the element's established appearance
    Reference,
    /// Leave the element alone
    None,
}

/// A manifestation score enriched with analysis outputs.
///
/// Produced by the telemetry analyzer; pure function of the raw score, so
/// analyzing the same input twice yields identical values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct EnhancedManifestationScore {
    /// The underlying counters
    score: ManifestationScore,
    /// Rate over the recent window (equals lifetime rate until the store
    /// protocol grows windowed history)
    recent_rate: f64,
    /// Trend relative to the analyzer baseline
    trend: Trend,
    /// Analyzer confidence in `[0, 1]`
    confidence: f64,
    /// Inferred element category
    category: ElementCategory,
    /// Recommended enhancement strategy
    enhancement_strategy: EnhancementStrategy,
}

impl EnhancedManifestationScore {
    /// Assemble an enriched score; rates and confidence are clamped to `[0, 1]`.
    pub fn new(
        score: ManifestationScore,
        recent_rate: f64,
        trend: Trend,
        confidence: f64,
        category: ElementCategory,
        enhancement_strategy: EnhancementStrategy,
    ) -> Self {
        Self {
            score,
            recent_rate: recent_rate.clamp(0.0, 1.0),
            trend,
            confidence: confidence.clamp(0.0, 1.0),
            category,
            enhancement_strategy,
        }
    }
}

/// Aggregate telemetry summary for a run.
///
/// Performer maps are ordered so reports render deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct TelemetryReport {
    /// Number of tracked elements
    tracked_elements: usize,
    /// Total attempts across all elements
    total_attempts: u64,
    /// Mean manifestation rate across tracked elements
    average_rate: f64,
    /// Elements with weak rates, worst first by name order
    low_performers: BTreeMap<String, f64>,
    /// Elements with strong rates
    high_performers: BTreeMap<String, f64>,
    /// Ordered improvement suggestions
    suggestions: Vec<String>,
}

impl TelemetryReport {
    /// Assemble a telemetry report; the average rate is clamped to `[0, 1]`.
    pub fn new(
        tracked_elements: usize,
        total_attempts: u64,
        average_rate: f64,
        low_performers: BTreeMap<String, f64>,
        high_performers: BTreeMap<String, f64>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            tracked_elements,
            total_attempts,
            average_rate: average_rate.clamp(0.0, 1.0),
            low_performers,
            high_performers,
            suggestions,
        }
    }

    /// An empty report for runs with no telemetry history.
    pub fn empty() -> Self {
        Self::new(0, 0, 0.0, BTreeMap::new(), BTreeMap::new(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_element_gets_neutral_rate() {
        let score = ManifestationScore::new("sword");
        assert_eq!(*score.attempts(), 0);
        assert_eq!(score.rate(), DEFAULT_MANIFESTATION_RATE);
    }

    #[test]
    fn rate_tracks_outcomes() {
        let mut score = ManifestationScore::new("red notebook");
        for _ in 0..16 {
            score.record(true);
        }
        for _ in 0..4 {
            score.record(false);
        }
        assert_eq!(*score.attempts(), 20);
        assert_eq!(score.rate(), 0.8);
    }

    #[test]
    fn from_counts_caps_successes() {
        let score = ManifestationScore::from_counts("coat", 5, 9);
        assert_eq!(*score.successes(), 5);
        assert_eq!(score.rate(), 1.0);
    }

    #[test]
    fn enhanced_score_clamps_numeric_fields() {
        let enriched = EnhancedManifestationScore::new(
            ManifestationScore::new("coat"),
            1.4,
            Trend::Stable,
            -0.3,
            ElementCategory::Costume,
            EnhancementStrategy::Reference,
        );
        assert_eq!(*enriched.recent_rate(), 1.0);
        assert_eq!(*enriched.confidence(), 0.0);
    }
}
