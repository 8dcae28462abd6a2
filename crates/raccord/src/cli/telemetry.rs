//! Telemetry management command handlers.

use crate::cli::commands::{TelemetryCommands, default_state_dir};
use raccord_engine::{analyze_scores, build_report};
use raccord_error::RaccordResult;
use raccord_interface::TelemetryStore;
use raccord_storage::JsonFileTelemetryStore;
use std::path::PathBuf;
use tracing::info;

/// Dispatch a telemetry subcommand.
pub async fn handle_telemetry_command(command: TelemetryCommands) -> RaccordResult<()> {
    match command {
        TelemetryCommands::Show { state_dir } => show_telemetry(state_dir).await,
        TelemetryCommands::Record {
            element,
            appeared,
            state_dir,
        } => record_outcome(element, appeared, state_dir).await,
        TelemetryCommands::Clear { state_dir } => clear_state(state_dir).await,
    }
}

fn open_store(state_dir: Option<PathBuf>) -> RaccordResult<JsonFileTelemetryStore> {
    JsonFileTelemetryStore::new(state_dir.unwrap_or_else(default_state_dir))
}

async fn show_telemetry(state_dir: Option<PathBuf>) -> RaccordResult<()> {
    let store = open_store(state_dir)?;
    let scores = store.load_manifestation_scores().await?;

    if scores.is_empty() {
        println!("No telemetry recorded yet.");
        return Ok(());
    }

    let enriched = analyze_scores(&scores);
    let report = build_report(&enriched);

    println!(
        "{} tracked element(s), {} attempt(s), average rate {:.0}%\n",
        report.tracked_elements(),
        report.total_attempts(),
        report.average_rate() * 100.0
    );

    for (element, score) in &enriched {
        println!(
            "{element}: rate {:.0}% over {} attempt(s) [{} | {} | {}]",
            score.score().rate() * 100.0,
            score.score().attempts(),
            score.category(),
            score.trend(),
            score.enhancement_strategy(),
        );
    }

    if !report.suggestions().is_empty() {
        println!();
        for (index, suggestion) in report.suggestions().iter().enumerate() {
            println!("{}. {}", index + 1, suggestion);
        }
    }

    Ok(())
}

async fn record_outcome(
    element: String,
    appeared: bool,
    state_dir: Option<PathBuf>,
) -> RaccordResult<()> {
    let store = open_store(state_dir)?;
    store.record_manifestation(&element, appeared).await?;
    let scores = store.load_manifestation_scores().await?;
    let score = &scores[&element];
    info!(
        element = %element,
        appeared,
        rate = score.rate(),
        attempts = score.attempts(),
        "Recorded outcome"
    );
    println!(
        "{element}: {} of {} attempt(s) manifested ({:.0}%)",
        score.successes(),
        score.attempts(),
        score.rate() * 100.0
    );
    Ok(())
}

async fn clear_state(state_dir: Option<PathBuf>) -> RaccordResult<()> {
    let store = open_store(state_dir)?;
    store.clear().await?;
    println!("Cleared persisted continuity state and telemetry.");
    Ok(())
}
