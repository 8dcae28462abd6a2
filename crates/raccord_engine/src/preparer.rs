//! Scene preparation: normalizing raw input into canonical scene records.

use crate::extractor::heuristic_character_names;
use raccord_core::{ContinuityAnchor, Scene, SceneSeed};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Stories shorter than this log an input warning; the run still proceeds.
const SHORT_STORY_CHARS: usize = 40;

/// Normalize raw input into an ordered scene list with 1-based ids.
///
/// When pre-segmented scenes are supplied they are used verbatim; otherwise
/// the entire story degrades to a single scene whose characters and props
/// derive from the extracted anchors. This component has no failure mode.
#[tracing::instrument(skip_all, fields(segment_count = segments.as_ref().map(Vec::len)))]
pub fn prepare_scenes(
    story: &str,
    segments: Option<Vec<SceneSeed>>,
    anchors: &[ContinuityAnchor],
) -> Vec<Scene> {
    if story.trim().is_empty() {
        warn!("Story text is empty; downstream output will be degraded");
    } else if story.len() < SHORT_STORY_CHARS {
        warn!(
            story_len = story.len(),
            "Story text is very short; extraction quality will suffer"
        );
    }

    match segments {
        Some(seeds) if !seeds.is_empty() => seeds
            .into_iter()
            .enumerate()
            .map(|(index, seed)| seed.into_scene(index + 1))
            .collect(),
        Some(_) => {
            warn!("Pre-segmented scene list is empty; degrading to a single scene");
            vec![single_scene(story, anchors)]
        }
        None => vec![single_scene(story, anchors)],
    }
}

/// The single-scene degradation: the whole story as one scene, populated
/// from whatever the extractor found.
fn single_scene(story: &str, anchors: &[ContinuityAnchor]) -> Scene {
    let characters: Vec<String> = anchors
        .iter()
        .map(|anchor| anchor.character_name().to_string())
        .collect();
    let mut props: Vec<String> = Vec::new();
    for anchor in anchors {
        for prop in anchor.props() {
            if !props.iter().any(|p| p.eq_ignore_ascii_case(prop)) {
                props.push(prop.clone());
            }
        }
    }
    Scene::new(1, "", characters, props, story, "neutral")
}

fn slugline_regex() -> &'static Regex {
    static SLUGLINE: OnceLock<Regex> = OnceLock::new();
    SLUGLINE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:INT|EXT|INT/EXT)\.?\s+(.+?)\s*$").expect("slugline regex is valid")
    })
}

fn prop_cue_regex() -> &'static Regex {
    static PROP_CUE: OnceLock<Regex> = OnceLock::new();
    PROP_CUE.get_or_init(|| {
        Regex::new(r"(?i)(?:carrying|holding|clutching|wielding)\s+(?:a|an|the)\s+([^.,;\n]+)")
            .expect("prop cue regex is valid")
    })
}

/// Split screenplay-formatted text into scene seeds on INT./EXT. sluglines.
///
/// An opt-in front end for callers holding raw screenplay text: the heading
/// supplies the location, the body supplies candidate characters and prop
/// cues. Text with no sluglines yields a single seed so the preparer's
/// contract is unchanged either way.
#[tracing::instrument(skip_all, fields(story_len = story.len()))]
pub fn segment_screenplay(story: &str) -> Vec<SceneSeed> {
    let headings: Vec<(usize, usize, String)> = slugline_regex()
        .captures_iter(story)
        .map(|caps| {
            let whole = caps.get(0).expect("capture 0 always present");
            let location = normalize_location(&caps[1]);
            (whole.start(), whole.end(), location)
        })
        .collect();

    if headings.is_empty() {
        return vec![seed_from_block(story, String::new())];
    }

    headings
        .iter()
        .enumerate()
        .map(|(index, (_, body_start, location))| {
            let body_end = headings
                .get(index + 1)
                .map(|(next_start, _, _)| *next_start)
                .unwrap_or(story.len());
            seed_from_block(&story[*body_start..body_end], location.clone())
        })
        .collect()
}

/// Strip the time-of-day suffix and lowercase: "COFFEE SHOP - DAY" -> "coffee shop".
fn normalize_location(heading: &str) -> String {
    let location = heading
        .split(" - ")
        .next()
        .unwrap_or(heading)
        .trim()
        .to_lowercase();
    location
}

fn seed_from_block(body: &str, location: String) -> SceneSeed {
    let text = body.trim().to_string();
    let characters = heuristic_character_names(&text, 10);
    let props: Vec<String> = prop_cue_regex()
        .captures_iter(&text)
        .map(|caps| caps[1].trim().to_lowercase())
        .collect();

    SceneSeed::builder()
        .location(location)
        .characters(characters)
        .props(props)
        .text(text)
        .build()
        .expect("all seed fields have defaults")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SCENE_SCRIPT: &str = "INT. COFFEE SHOP - DAY\n\
        Cole enters wearing a brown coat, carrying a red notebook.\n\
        \n\
        INT. POLICE STATION - NIGHT\n\
        Cole reviews evidence. His notebook is gone.";

    #[test]
    fn no_segments_degrades_to_single_scene() {
        let anchors = vec![
            ContinuityAnchor::new("a0", "Cole").with_props(vec!["red notebook".to_string()]),
        ];
        let scenes = prepare_scenes("Cole walks.", None, &anchors);
        assert_eq!(scenes.len(), 1);
        assert_eq!(*scenes[0].id(), 1);
        assert_eq!(scenes[0].characters(), &["Cole".to_string()]);
        assert_eq!(scenes[0].props(), &["red notebook".to_string()]);
    }

    #[test]
    fn segments_get_sequential_ids() {
        let seeds = vec![
            SceneSeed::builder().text("first").build().unwrap(),
            SceneSeed::builder().text("second").build().unwrap(),
        ];
        let scenes = prepare_scenes("story", Some(seeds), &[]);
        assert_eq!(scenes.len(), 2);
        assert_eq!(*scenes[0].id(), 1);
        assert_eq!(*scenes[1].id(), 2);
    }

    #[test]
    fn screenplay_splits_on_sluglines() {
        let seeds = segment_screenplay(TWO_SCENE_SCRIPT);
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].location(), "coffee shop");
        assert_eq!(seeds[1].location(), "police station");
        assert!(seeds[0].characters().contains(&"Cole".to_string()));
    }

    #[test]
    fn screenplay_extracts_prop_cues() {
        let seeds = segment_screenplay(TWO_SCENE_SCRIPT);
        assert_eq!(seeds[0].props(), &["red notebook".to_string()]);
        assert!(seeds[1].props().is_empty());
    }

    #[test]
    fn text_without_sluglines_yields_one_seed() {
        let seeds = segment_screenplay("Just a bare description of a shot.");
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].location(), "");
    }
}
