//! Telemetry analysis: trends, categories, confidence, and strategies.
//!
//! The analyzer is a pure function of the raw score map; analyzing the
//! same input twice yields identical enriched scores and suggestions.

use raccord_core::{
    ElementCategory, EnhancedManifestationScore, EnhancementStrategy, ManifestationScore,
    TelemetryReport, Trend,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Attempts required before a trend judgment is made.
const TREND_MIN_ATTEMPTS: u64 = 5;
/// Baseline rate trends are measured against.
const TREND_BASELINE: f64 = 0.7;
/// Band around the baseline treated as stable.
const TREND_BAND: f64 = 0.15;
/// Attempts at which analyzer confidence saturates.
const CONFIDENCE_SATURATION_ATTEMPTS: f64 = 20.0;
/// Rates at or above this need no enhancement.
const STRATEGY_NONE_THRESHOLD: f64 = 0.8;
/// Rates below this always get a boost.
const STRATEGY_BOOST_THRESHOLD: f64 = 0.3;
/// Category average below this triggers a warning insight.
const CATEGORY_WARNING_THRESHOLD: f64 = 0.6;
/// Rate below which an element counts as a low performer.
const LOW_PERFORMER_THRESHOLD: f64 = 0.5;
/// Rate at or above which an element counts as a high performer.
const HIGH_PERFORMER_THRESHOLD: f64 = 0.85;

const PROP_KEYWORDS: &[&str] = &[
    "notebook", "book", "phone", "gun", "knife", "sword", "bag", "cup", "glass", "letter", "key",
    "camera", "lantern", "umbrella", "crowbar", "briefcase", "ring", "watch",
];
const LOCATION_KEYWORDS: &[&str] = &[
    "room", "station", "street", "house", "shop", "office", "forest", "city", "alley", "rooftop",
    "warehouse", "bar", "cafe", "park", "interior", "exterior",
];
const COSTUME_KEYWORDS: &[&str] = &[
    "coat", "jacket", "dress", "uniform", "suit", "shirt", "gown", "cloak", "scarf", "hat",
    "boots", "gloves",
];
const ACTION_KEYWORDS: &[&str] = &[
    "running", "walking", "fighting", "dancing", "chasing", "jumping", "driving", "falling",
];

/// Enrich every raw score with trend, category, confidence, and strategy.
#[tracing::instrument(skip_all, fields(tracked = scores.len()))]
pub fn analyze_scores(
    scores: &BTreeMap<String, ManifestationScore>,
) -> BTreeMap<String, EnhancedManifestationScore> {
    scores
        .iter()
        .map(|(element, score)| (element.clone(), enrich(score)))
        .collect()
}

/// Build the aggregate telemetry report from enriched scores.
pub fn build_report(
    enriched: &BTreeMap<String, EnhancedManifestationScore>,
) -> TelemetryReport {
    if enriched.is_empty() {
        return TelemetryReport::empty();
    }

    let total_attempts: u64 = enriched.values().map(|e| *e.score().attempts()).sum();
    let average_rate =
        enriched.values().map(|e| e.score().rate()).sum::<f64>() / enriched.len() as f64;

    let mut low_performers = BTreeMap::new();
    let mut high_performers = BTreeMap::new();
    for (element, score) in enriched {
        let rate = score.score().rate();
        if *score.score().attempts() == 0 {
            continue;
        }
        if rate < LOW_PERFORMER_THRESHOLD {
            low_performers.insert(element.clone(), rate);
        } else if rate >= HIGH_PERFORMER_THRESHOLD {
            high_performers.insert(element.clone(), rate);
        }
    }

    let suggestions = pattern_insights(enriched);

    TelemetryReport::new(
        enriched.len(),
        total_attempts,
        average_rate,
        low_performers,
        high_performers,
        suggestions,
    )
}

fn enrich(score: &ManifestationScore) -> EnhancedManifestationScore {
    let rate = score.rate();
    let category = infer_category(score.element());
    let trend = infer_trend(score);
    let confidence = analyzer_confidence(score);
    let strategy = select_strategy(rate, category);
    debug!(
        element = %score.element(),
        rate,
        %category,
        %trend,
        %strategy,
        "Enriched manifestation score"
    );
    // Lifetime counters are all the store protocol persists, so the
    // recent rate equals the lifetime rate for now.
    EnhancedManifestationScore::new(score.clone(), rate, trend, confidence, category, strategy)
}

/// Keyword and capitalization heuristics over the element name.
pub(crate) fn infer_category(element: &str) -> ElementCategory {
    let lower = element.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if contains_any(COSTUME_KEYWORDS) {
        return ElementCategory::Costume;
    }
    if contains_any(PROP_KEYWORDS) {
        return ElementCategory::Prop;
    }
    if contains_any(LOCATION_KEYWORDS) {
        return ElementCategory::Location;
    }
    if contains_any(ACTION_KEYWORDS) {
        return ElementCategory::Action;
    }
    if looks_like_name(element) {
        return ElementCategory::Character;
    }
    ElementCategory::Unknown
}

/// Single capitalized word, the way characters are named in prompts.
fn looks_like_name(element: &str) -> bool {
    let mut words = element.split_whitespace();
    let (Some(word), None) = (words.next(), words.next()) else {
        return false;
    };
    let mut chars = word.chars();
    matches!(chars.next(), Some(first) if first.is_uppercase()) && chars.all(|c| c.is_lowercase())
}

fn infer_trend(score: &ManifestationScore) -> Trend {
    if *score.attempts() < TREND_MIN_ATTEMPTS {
        return Trend::Insufficient;
    }
    let delta = score.rate() - TREND_BASELINE;
    if delta > TREND_BAND {
        Trend::Improving
    } else if delta < -TREND_BAND {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// More data and less-extreme rates both raise confidence.
fn analyzer_confidence(score: &ManifestationScore) -> f64 {
    let data_factor = (*score.attempts() as f64 / CONFIDENCE_SATURATION_ATTEMPTS).min(1.0);
    let extremity_factor = 1.0 - (score.rate() - 0.5).abs() * 0.5;
    data_factor * extremity_factor
}

fn select_strategy(rate: f64, category: ElementCategory) -> EnhancementStrategy {
    if rate >= STRATEGY_NONE_THRESHOLD {
        return EnhancementStrategy::None;
    }
    if rate < STRATEGY_BOOST_THRESHOLD {
        return EnhancementStrategy::Boost;
    }
    match category {
        ElementCategory::Character | ElementCategory::Costume => EnhancementStrategy::Reference,
        ElementCategory::Prop => EnhancementStrategy::Boost,
        ElementCategory::Location => EnhancementStrategy::Context,
        ElementCategory::Action => EnhancementStrategy::Rephrase,
        ElementCategory::Unknown => {
            if rate < 0.5 {
                EnhancementStrategy::Boost
            } else {
                EnhancementStrategy::None
            }
        }
    }
}

/// Narrative insight strings derived from the enriched score map.
fn pattern_insights(
    enriched: &BTreeMap<String, EnhancedManifestationScore>,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    // Per-category average-rate warnings.
    let mut category_totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for score in enriched.values() {
        let entry = category_totals
            .entry(score.category().to_string())
            .or_insert((0.0, 0));
        entry.0 += score.score().rate();
        entry.1 += 1;
    }
    for (category, (total, count)) in &category_totals {
        let average = total / *count as f64;
        if average < CATEGORY_WARNING_THRESHOLD {
            suggestions.push(format!(
                "{category} elements are averaging a {:.0}% manifestation rate; \
                 describe them earlier and more concretely in each prompt.",
                average * 100.0
            ));
        }
    }

    // Improving vs declining summary.
    let improving = enriched
        .values()
        .filter(|s| *s.trend() == Trend::Improving)
        .count();
    let declining = enriched
        .values()
        .filter(|s| *s.trend() == Trend::Declining)
        .count();
    if improving > 0 || declining > 0 {
        suggestions.push(format!(
            "{improving} element(s) trending up, {declining} trending down against baseline."
        ));
    }

    // Boost-count suggestion.
    let boost_count = enriched
        .values()
        .filter(|s| *s.enhancement_strategy() == EnhancementStrategy::Boost)
        .count();
    if boost_count > 0 {
        suggestions.push(format!(
            "{boost_count} element(s) need explicit visibility boosting in upcoming prompts."
        ));
    }

    suggestions
}
