//! Scene types for continuity analysis.

use serde::{Deserialize, Serialize};

/// A single narrative scene prepared for continuity analysis.
///
/// Scenes form an ordered sequence with strictly increasing 1-based ids.
/// The first scene in a run has no predecessor and always validates clean.
///
/// # Examples
///
/// ```
/// use raccord_core::Scene;
///
/// let scene = Scene::new(
///     1,
///     "coffee shop",
///     vec!["Cole".to_string()],
///     vec!["red notebook".to_string()],
///     "Cole enters wearing a brown coat, carrying a red notebook.",
///     "neutral",
/// );
/// assert_eq!(*scene.id(), 1);
/// assert_eq!(scene.props().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Scene {
    /// 1-based position in the scene sequence
    id: usize,
    /// Where the scene takes place
    location: String,
    /// Characters present in the scene
    characters: Vec<String>,
    /// Props present in the scene
    props: Vec<String>,
    /// The scene description fed to generation
    text: String,
    /// Emotional register of the scene
    tone: String,
}

impl Scene {
    /// Create a new scene.
    pub fn new(
        id: usize,
        location: impl Into<String>,
        characters: Vec<String>,
        props: Vec<String>,
        text: impl Into<String>,
        tone: impl Into<String>,
    ) -> Self {
        Self {
            id,
            location: location.into(),
            characters,
            props,
            text: text.into(),
            tone: tone.into(),
        }
    }

    /// Whether the named character appears in this scene (case-insensitive).
    pub fn has_character(&self, name: &str) -> bool {
        self.characters
            .iter()
            .any(|c| c.eq_ignore_ascii_case(name))
    }

    /// Whether the named prop appears in this scene (case-insensitive).
    pub fn has_prop(&self, prop: &str) -> bool {
        self.props.iter().any(|p| p.eq_ignore_ascii_case(prop))
    }
}

/// Caller-supplied scene input, before the preparer assigns sequence ids.
///
/// Pre-segmented scenes arrive through this type; the preparer converts
/// them into [`Scene`] records with 1-based ids in input order.
///
/// # Examples
///
/// ```
/// use raccord_core::SceneSeed;
///
/// let seed = SceneSeed::builder()
///     .location("police station")
///     .text("Cole reviews evidence.")
///     .characters(vec!["Cole".to_string()])
///     .build()
///     .unwrap();
/// assert_eq!(seed.tone(), "neutral");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct SceneSeed {
    /// Where the scene takes place
    #[serde(default)]
    location: String,
    /// Characters present in the scene
    #[serde(default)]
    characters: Vec<String>,
    /// Props present in the scene
    #[serde(default)]
    props: Vec<String>,
    /// The scene description fed to generation
    text: String,
    /// Emotional register of the scene
    #[serde(default = "default_tone")]
    tone: String,
}

fn default_tone() -> String {
    "neutral".to_string()
}

impl Default for SceneSeed {
    fn default() -> Self {
        Self {
            location: String::new(),
            characters: Vec::new(),
            props: Vec::new(),
            text: String::new(),
            tone: default_tone(),
        }
    }
}

impl SceneSeed {
    /// Create a builder for a scene seed.
    pub fn builder() -> SceneSeedBuilder {
        SceneSeedBuilder::default()
    }

    /// Where the scene takes place.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Characters present in the scene.
    pub fn characters(&self) -> &[String] {
        &self.characters
    }

    /// Props present in the scene.
    pub fn props(&self) -> &[String] {
        &self.props
    }

    /// The scene description text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Emotional register of the scene.
    pub fn tone(&self) -> &str {
        &self.tone
    }

    /// Convert this seed into a [`Scene`] with the given 1-based id.
    pub fn into_scene(self, id: usize) -> Scene {
        Scene {
            id,
            location: self.location,
            characters: self.characters,
            props: self.props,
            text: self.text,
            tone: self.tone,
        }
    }
}
