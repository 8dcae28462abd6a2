//! Engine error types.
//!
//! The engine degrades through phases 1-7 rather than failing; only the
//! terminal state persist and truly unexpected conditions produce an
//! `EngineError`. Callers therefore receive either a complete output or
//! exactly one of these.

/// Specific error conditions for engine runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum EngineErrorKind {
    /// The final continuity-state save failed, poisoning future runs
    #[display("Failed to persist continuity state: {}", _0)]
    StatePersist(String),
    /// The run was cancelled at a phase boundary
    #[display("Run cancelled before phase '{}'", _0)]
    Cancelled(String),
    /// An unanticipated failure, wrapped with its originating phase
    #[display("Unexpected failure in phase '{}': {}", phase, message)]
    Unexpected {
        /// Phase in which the failure originated
        phase: String,
        /// Underlying error message
        message: String,
    },
    /// The telemetry actor could not be reached
    #[display("Telemetry actor unavailable: {}", _0)]
    ActorUnavailable(String),
}

/// Error type for engine runs.
///
/// # Examples
///
/// ```
/// use raccord_error::{EngineError, EngineErrorKind};
///
/// let err = EngineError::new(EngineErrorKind::Cancelled("Validation".to_string()));
/// assert!(format!("{}", err).contains("cancelled"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Engine Error: {} at line {} in {}", kind, line, file)]
pub struct EngineError {
    /// The specific error condition
    pub kind: EngineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl EngineError {
    /// Create a new EngineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: EngineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
