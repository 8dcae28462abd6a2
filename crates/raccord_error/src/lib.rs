//! Error types for the Raccord continuity engine.
//!
//! This crate provides the foundation error types used throughout the Raccord
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use raccord_error::{RaccordResult, ConfigError};
//!
//! fn load_settings() -> RaccordResult<String> {
//!     Err(ConfigError::new("Missing state directory"))?
//! }
//!
//! match load_settings() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod extraction;
mod json;
mod storage;

pub use config::ConfigError;
pub use engine::{EngineError, EngineErrorKind};
pub use error::{RaccordError, RaccordErrorKind, RaccordResult};
pub use extraction::{ExtractionError, ExtractionErrorKind};
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
