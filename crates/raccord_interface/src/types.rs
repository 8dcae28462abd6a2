//! Input types supplied by upstream story-analysis collaborators.

use serde::{Deserialize, Serialize};

/// Pre-computed story analysis, consumed as the second extraction fallback.
///
/// Produced upstream (outside this crate) by whatever analyzed the
/// screenplay; the extractor derives one anchor per character and
/// attributes props that literally occur in the story text.
///
/// # Examples
///
/// ```
/// use raccord_interface::StoryAnalysis;
///
/// let analysis = StoryAnalysis::new(
///     vec!["Cole".to_string()],
///     vec!["coffee shop".to_string()],
///     vec!["red notebook".to_string()],
/// );
/// assert_eq!(analysis.characters().len(), 1);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct StoryAnalysis {
    /// Character names found in the story
    characters: Vec<String>,
    /// Locations found in the story
    locations: Vec<String>,
    /// Props found in the story
    props: Vec<String>,
}

impl StoryAnalysis {
    /// Create a new analysis.
    pub fn new(characters: Vec<String>, locations: Vec<String>, props: Vec<String>) -> Self {
        Self {
            characters,
            locations,
            props,
        }
    }
}
