//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the
//! raccord binary.

mod commands;
mod run;
mod telemetry;

pub use commands::{Cli, Commands, TelemetryCommands};
pub use run::run_story;
pub use telemetry::handle_telemetry_command;
