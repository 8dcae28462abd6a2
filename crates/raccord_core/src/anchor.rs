//! Continuity anchors: per-character accumulated visual facts.

use serde::{Deserialize, Serialize};

/// A tracked character's accumulated visual and continuity facts.
///
/// Anchors are the stable reference the validator and enhancer consult when
/// deciding whether a character's on-screen presentation drifted between
/// independently generated clips.
///
/// # Examples
///
/// ```
/// use raccord_core::ContinuityAnchor;
///
/// let anchor = ContinuityAnchor::new("cole", "Cole")
///     .with_visual_description("mid-40s detective, weathered face")
///     .with_costumes(vec!["brown coat".to_string()])
///     .with_scene_references(vec![1, 2]);
/// assert_eq!(anchor.character_name(), "Cole");
/// assert_eq!(anchor.scene_references(), &[1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ContinuityAnchor {
    /// Stable identifier for this anchor
    id: String,
    /// Character name as it appears in scene descriptions
    character_name: String,
    /// Visual description carried across scenes
    visual_description: String,
    /// Costume pieces associated with the character
    costumes: Vec<String>,
    /// Props associated with the character
    props: Vec<String>,
    /// Free-form appearance notes
    appearance_notes: String,
    /// 1-based ids of scenes the character appears in
    scene_references: Vec<usize>,
}

impl ContinuityAnchor {
    /// Create a minimal anchor for a character.
    pub fn new(id: impl Into<String>, character_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            character_name: character_name.into(),
            visual_description: String::new(),
            costumes: Vec::new(),
            props: Vec::new(),
            appearance_notes: String::new(),
            scene_references: Vec::new(),
        }
    }

    /// Set the visual description.
    pub fn with_visual_description(mut self, description: impl Into<String>) -> Self {
        self.visual_description = description.into();
        self
    }

    /// Set the costume list.
    pub fn with_costumes(mut self, costumes: Vec<String>) -> Self {
        self.costumes = costumes;
        self
    }

    /// Set the prop list.
    pub fn with_props(mut self, props: Vec<String>) -> Self {
        self.props = props;
        self
    }

    /// Set the appearance notes.
    pub fn with_appearance_notes(mut self, notes: impl Into<String>) -> Self {
        self.appearance_notes = notes.into();
        self
    }

    /// Set the scene references.
    pub fn with_scene_references(mut self, references: Vec<usize>) -> Self {
        self.scene_references = references;
        self
    }

    /// Drop scene references that point outside the prepared scene list.
    ///
    /// Anchors must never reference nonexistent scenes; extraction
    /// collaborators cannot be trusted to honor that, so the engine
    /// sanitizes anchors against the prepared scene count.
    pub fn sanitize_references(&mut self, scene_count: usize) {
        self.scene_references
            .retain(|id| *id >= 1 && *id <= scene_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_out_of_range_references() {
        let mut anchor =
            ContinuityAnchor::new("a1", "Cole").with_scene_references(vec![0, 1, 2, 7]);
        anchor.sanitize_references(3);
        assert_eq!(anchor.scene_references(), &[1, 2]);
    }

    #[test]
    fn builder_style_construction() {
        let anchor = ContinuityAnchor::new("a2", "Dana")
            .with_costumes(vec!["red scarf".to_string()])
            .with_appearance_notes("always carries an umbrella");
        assert_eq!(anchor.costumes().len(), 1);
        assert!(anchor.appearance_notes().contains("umbrella"));
    }
}
