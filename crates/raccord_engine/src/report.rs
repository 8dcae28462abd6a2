//! Production-notes rendering.
//!
//! A pure function of its inputs: no I/O, no clock, deterministic output
//! for identical runs so notes can be diffed between revisions.

use crate::EngineConfig;
use raccord_core::{ContinuityAnchor, SceneValidationResult, TelemetryReport};

/// Qualitative tier for an overall score.
fn score_label(score: f64) -> &'static str {
    if score >= 90.0 {
        "Excellent"
    } else if score >= 75.0 {
        "Good"
    } else if score >= 60.0 {
        "Fair"
    } else {
        "Needs Work"
    }
}

/// Render the markdown production notes for a run.
#[tracing::instrument(skip_all, fields(score = score))]
pub fn render_production_notes(
    score: f64,
    anchors: &[ContinuityAnchor],
    validations: &[SceneValidationResult],
    telemetry: &TelemetryReport,
    config: &EngineConfig,
) -> String {
    let mut notes = String::new();

    notes.push_str("# Continuity Production Notes\n\n");
    notes.push_str(&format!(
        "**Overall score: {score:.1} / 100 — {}**\n\n",
        score_label(score)
    ));

    render_anchor_section(&mut notes, anchors, *config.report_anchor_limit());
    render_review_section(&mut notes, validations, *config.report_failed_scene_limit());
    render_telemetry_section(&mut notes, telemetry);
    render_recommendations(&mut notes, telemetry);

    notes
}

fn render_anchor_section(notes: &mut String, anchors: &[ContinuityAnchor], limit: usize) {
    notes.push_str("## Continuity anchors\n\n");
    if anchors.is_empty() {
        notes.push_str("No recurring characters were identified.\n\n");
        return;
    }
    for anchor in anchors.iter().take(limit) {
        notes.push_str(&format!("- **{}**", anchor.character_name()));
        if !anchor.visual_description().is_empty() {
            notes.push_str(&format!(" — {}", anchor.visual_description()));
        }
        if !anchor.costumes().is_empty() {
            notes.push_str(&format!(" (wardrobe: {})", anchor.costumes().join(", ")));
        }
        if !anchor.scene_references().is_empty() {
            let refs: Vec<String> = anchor
                .scene_references()
                .iter()
                .map(usize::to_string)
                .collect();
            notes.push_str(&format!("; scenes {}", refs.join(", ")));
        }
        notes.push('\n');
    }
    if anchors.len() > limit {
        notes.push_str(&format!("- …and {} more\n", anchors.len() - limit));
    }
    notes.push('\n');
}

fn render_review_section(
    notes: &mut String,
    validations: &[SceneValidationResult],
    limit: usize,
) {
    let failed: Vec<&SceneValidationResult> = validations
        .iter()
        .filter(|v| v.requires_human_review())
        .collect();

    notes.push_str("## Scenes needing review\n\n");
    if failed.is_empty() {
        notes.push_str("All scenes passed continuity validation.\n\n");
        return;
    }
    for result in failed.iter().take(limit) {
        notes.push_str(&format!(
            "### Scene {} (confidence {:.2})\n\n",
            result.scene_id(),
            result.confidence()
        ));
        for issue in result.issues() {
            notes.push_str(&format!(
                "- {}: {} (severity {:.1})\n",
                issue.issue_type(),
                issue.description(),
                issue.severity()
            ));
        }
        notes.push('\n');
    }
    if failed.len() > limit {
        notes.push_str(&format!(
            "…and {} more scene(s) below the confidence threshold.\n\n",
            failed.len() - limit
        ));
    }
}

fn render_telemetry_section(notes: &mut String, telemetry: &TelemetryReport) {
    notes.push_str("## Manifestation telemetry\n\n");
    if *telemetry.tracked_elements() == 0 {
        notes.push_str("No telemetry history yet; rates will appear after the first generations are scored.\n\n");
        return;
    }
    notes.push_str(&format!(
        "{} tracked element(s), {} total attempt(s), average rate {:.0}%.\n\n",
        telemetry.tracked_elements(),
        telemetry.total_attempts(),
        telemetry.average_rate() * 100.0
    ));
    if !telemetry.low_performers().is_empty() {
        notes.push_str("Low performers:\n");
        for (element, rate) in telemetry.low_performers() {
            notes.push_str(&format!("- {element}: {:.0}%\n", rate * 100.0));
        }
        notes.push('\n');
    }
    if !telemetry.high_performers().is_empty() {
        notes.push_str("High performers:\n");
        for (element, rate) in telemetry.high_performers() {
            notes.push_str(&format!("- {element}: {:.0}%\n", rate * 100.0));
        }
        notes.push('\n');
    }
}

fn render_recommendations(notes: &mut String, telemetry: &TelemetryReport) {
    let mut recommendations: Vec<String> = telemetry.suggestions().clone();
    for (element, rate) in telemetry.low_performers() {
        recommendations.push(format!(
            "'{element}' manifests in only {:.0}% of attempts; add an explicit visibility cue.",
            rate * 100.0
        ));
    }

    if recommendations.is_empty() {
        return;
    }
    notes.push_str("## Recommendations\n\n");
    for (index, recommendation) in recommendations.iter().enumerate() {
        notes.push_str(&format!("{}. {}\n", index + 1, recommendation));
    }
    notes.push('\n');
}
