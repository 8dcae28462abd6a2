//! Top-level error wrapper types.

use crate::{ConfigError, EngineError, ExtractionError, JsonError, StorageError};

/// This is the foundation error enum. Additional variants will be added
/// by other raccord crates as the workspace grows.
///
/// # Examples
///
/// ```
/// use raccord_error::{RaccordError, StorageError, StorageErrorKind};
///
/// let storage_err = StorageError::new(StorageErrorKind::Unavailable("offline".to_string()));
/// let err: RaccordError = storage_err.into();
/// assert!(format!("{}", err).contains("Storage Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum RaccordErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Anchor extraction error
    #[from(ExtractionError)]
    Extraction(ExtractionError),
    /// Engine run error
    #[from(EngineError)]
    Engine(EngineError),
}

/// Raccord error with kind discrimination.
///
/// # Examples
///
/// ```
/// use raccord_error::{RaccordResult, ConfigError};
///
/// fn might_fail() -> RaccordResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Raccord Error: {}", _0)]
pub struct RaccordError(Box<RaccordErrorKind>);

impl RaccordError {
    /// Create a new error from a kind.
    pub fn new(kind: RaccordErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RaccordErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to RaccordErrorKind
impl<T> From<T> for RaccordError
where
    T: Into<RaccordErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Raccord operations.
///
/// # Examples
///
/// ```
/// use raccord_error::{RaccordResult, JsonError};
///
/// fn decode() -> RaccordResult<String> {
///     Err(JsonError::new("unexpected end of input"))?
/// }
/// ```
pub type RaccordResult<T> = std::result::Result<T, RaccordError>;
