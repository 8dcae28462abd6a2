//! Raccord CLI binary.
//!
//! This binary provides command-line access to the continuity engine:
//! - Run a story or screenplay through the pipeline and print the notes
//! - Inspect and record manifestation telemetry
//! - Clear persisted continuity state

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_telemetry_command, run_story};

    // Load .env if present (state directory overrides, log levels)
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Execute the requested command
    match cli.command {
        Commands::Run {
            story,
            segment,
            state_dir,
            ephemeral,
            config,
            output,
        } => {
            run_story(&story, segment, state_dir, ephemeral, config, output).await?;
        }

        Commands::Telemetry(telemetry_cmd) => {
            handle_telemetry_command(telemetry_cmd).await?;
        }
    }

    Ok(())
}
