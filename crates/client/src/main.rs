//! Headless table client.
//!
//! Loads the typed configuration, assembles the runtime (file snapshots,
//! camera calibration, console input), forwards events to the log, and
//! runs the game loop until a winner is declared.

mod config;
mod provider;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use runtime::{
    Event, FileSnapshotRepository, GameEvent, ReconciliationEvent, Runtime, RuntimeConfig,
    RuntimeHandle, Topic, TurnEvent,
};

use crate::config::ClientConfig;
use crate::provider::ConsoleProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("hextable.json"));
    let config = ClientConfig::load(&config_path)?;

    let snapshot_dir = config.snapshot_dir()?;
    let snapshots = FileSnapshotRepository::new(&snapshot_dir)
        .with_context(|| format!("opening snapshot dir {}", snapshot_dir.display()))?;
    info!(dir = %snapshot_dir.display(), "snapshots enabled");

    let mut builder = Runtime::builder()
        .config(RuntimeConfig {
            game_config: config.game.clone(),
            game_seed: config.game_seed,
            ..RuntimeConfig::default()
        })
        .snapshots(Arc::new(snapshots))
        .provider(ConsoleProvider::new());

    if let Some(topology) = config.board()? {
        builder = builder.topology(topology);
    }
    if let Some(calibration) = config.calibration()? {
        builder = builder.calibration(calibration);
    }

    let mut runtime = builder.build()?;
    spawn_event_logger(&runtime.handle());

    runtime.run().await?;
    runtime.shutdown().await?;
    Ok(())
}

/// Forward runtime events to the log, standing in for the lights, LCD, and
/// dashboard collaborators. Only the receivers move into the task, so the
/// logger never keeps the worker's command channel alive.
fn spawn_event_logger(handle: &RuntimeHandle) {
    let mut game_rx = handle.subscribe(Topic::Game);
    let mut turn_rx = handle.subscribe(Topic::Turn);
    let mut vision_rx = handle.subscribe(Topic::Reconciliation);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                event = game_rx.recv() => match event {
                    Ok(Event::Game(GameEvent::WinnerDeclared { player, points, .. })) => {
                        info!(%player, points, "WINNER");
                    }
                    Ok(Event::Game(GameEvent::ActionRejected { reason, .. })) => {
                        info!(reason, "action rejected");
                    }
                    Ok(_) => {}
                    Err(_) => break,
                },
                event = turn_rx.recv() => match event {
                    Ok(Event::Turn(TurnEvent::TurnStarted { player, turn_number })) => {
                        info!(%player, turn_number, "turn started");
                    }
                    Ok(Event::Turn(TurnEvent::DiceRolled { player, dice, .. })) => {
                        info!(%player, total = dice.total(), "dice rolled");
                    }
                    Ok(_) => {}
                    Err(_) => break,
                },
                event = vision_rx.recv() => match event {
                    Ok(Event::Reconciliation(ReconciliationEvent::Conflict(conflict))) => {
                        info!(
                            slot = %conflict.slot,
                            proposed = %conflict.proposed,
                            reason = conflict.reason,
                            "RECONCILIATION CONFLICT - operator review needed"
                        );
                    }
                    Ok(Event::Reconciliation(ReconciliationEvent::CorrectionApplied {
                        slot,
                        owner,
                        ..
                    })) => {
                        info!(%slot, %owner, "vision correction applied");
                    }
                    Ok(_) => {}
                    Err(_) => break,
                },
            }
        }
    });
}
