//! Telemetry store implementations for the Raccord continuity engine.
//!
//! Two reference implementations of the [`raccord_interface::TelemetryStore`]
//! protocol:
//!
//! - [`MemoryTelemetryStore`] — ephemeral, in-process; for tests and
//!   single-run tooling that does not need durability.
//! - [`JsonFileTelemetryStore`] — durable JSON files under a state
//!   directory, written atomically via temp-file + rename.
//!
//! Both satisfy identical observable semantics; the protocol conformance
//! suite in `tests/` runs against each.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod json_file;
mod memory;

pub use json_file::JsonFileTelemetryStore;
pub use memory::MemoryTelemetryStore;
