//! Anchor extraction error types.
//!
//! Extraction errors never surface to engine callers. The extractor's
//! fallback chain absorbs them, but collaborator implementations still
//! report typed failures so the degradation can be logged with cause.

/// Specific error conditions for anchor extraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExtractionErrorKind {
    /// The extraction collaborator returned an error
    #[display("Extraction collaborator failed: {}", _0)]
    Collaborator(String),
    /// The extraction collaborator did not respond within the deadline
    #[display("Extraction timed out after {} seconds", _0)]
    Timeout(u64),
    /// The collaborator response could not be decoded into anchors
    #[display("Failed to decode extraction response: {}", _0)]
    Decode(String),
}

/// Error type for anchor extraction operations.
///
/// # Examples
///
/// ```
/// use raccord_error::{ExtractionError, ExtractionErrorKind};
///
/// let err = ExtractionError::new(ExtractionErrorKind::Timeout(20));
/// assert!(format!("{}", err).contains("timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Extraction Error: {} at line {} in {}", kind, line, file)]
pub struct ExtractionError {
    /// The specific error condition
    pub kind: ExtractionErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExtractionError {
    /// Create a new ExtractionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExtractionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
