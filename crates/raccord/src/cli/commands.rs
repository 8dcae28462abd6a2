//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Raccord - continuity engine for AI-generated video
#[derive(Parser, Debug)]
#[command(name = "raccord")]
#[command(
    about = "Validate scene continuity, learn manifestation rates, and rewrite prompts",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a story through the continuity pipeline
    Run {
        /// Path to the story or screenplay text file
        #[arg(long)]
        story: PathBuf,

        /// Split the story on INT./EXT. sluglines before analysis
        #[arg(long)]
        segment: bool,

        /// State directory for persisted telemetry (default: .raccord)
        #[arg(long)]
        state_dir: Option<PathBuf>,

        /// Use an in-memory store; nothing is persisted
        #[arg(long)]
        ephemeral: bool,

        /// Path to an engine configuration TOML file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the full engine output as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Telemetry management commands
    #[command(subcommand)]
    Telemetry(TelemetryCommands),
}

/// Telemetry management subcommands
#[derive(Subcommand, Debug)]
pub enum TelemetryCommands {
    /// Show the manifestation telemetry summary
    Show {
        /// State directory for persisted telemetry (default: .raccord)
        #[arg(long)]
        state_dir: Option<PathBuf>,
    },

    /// Record one generation outcome for an element
    Record {
        /// The tracked element name
        element: String,

        /// Whether the element appeared in the generated output
        #[arg(long)]
        appeared: bool,

        /// State directory for persisted telemetry (default: .raccord)
        #[arg(long)]
        state_dir: Option<PathBuf>,
    },

    /// Remove all persisted state and counters
    Clear {
        /// State directory for persisted telemetry (default: .raccord)
        #[arg(long)]
        state_dir: Option<PathBuf>,
    },
}

/// The default state directory used when none is supplied.
pub fn default_state_dir() -> PathBuf {
    PathBuf::from(".raccord")
}
