//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the table.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use game_core::{
    BoardTopology, Calibration, GameConfig, GameState, PlayerId, TurnPhase, default_calibration,
    standard_topology,
};

use crate::error::{Result, RuntimeError};
use crate::events::EventBus;
use crate::handle::RuntimeHandle;
use crate::providers::ActionProvider;
use crate::repository::{MemorySnapshotRepository, SnapshotRepository};
use crate::vision::{SlotMatcher, VisionReconciler};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Seed for the board deal and all in-game randomness when no snapshot
    /// is resumed.
    pub game_seed: u64,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            game_seed: 0,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime orchestrating the game loop.
///
/// Owns the simulation worker; [`RuntimeHandle`] provides a cloneable
/// façade for clients and display collaborators.
pub struct Runtime {
    handle: RuntimeHandle,
    provider: Option<Box<dyn ActionProvider>>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// A cloneable handle to this runtime.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Drive one provider-sourced action through the engine.
    ///
    /// During the discard phase the obligated seats act instead of the
    /// active player. A rejected action is not an error here: the provider
    /// is simply asked again on the next step, as the input layer decides
    /// how to re-prompt.
    ///
    /// Returns `false` once the game has ended.
    pub async fn step(&mut self) -> Result<bool> {
        let provider = self.provider.as_ref().ok_or(RuntimeError::ProviderNotSet)?;

        let state = self.handle.query_state().await?;
        if state.turn.phase == TurnPhase::Ended {
            return Ok(false);
        }

        let seat = match state.turn.phase {
            TurnPhase::Discard => PlayerId::ALL
                .into_iter()
                .find(|&p| state.turn.owed_discards(p) > 0)
                .unwrap_or(state.turn.active_player),
            _ => state.turn.active_player,
        };

        let kind = provider.provide_action(seat, &state).await?;
        match self.handle.execute_action(kind).await {
            Ok(_) => {}
            Err(RuntimeError::Action(error)) => {
                tracing::debug!(error = %error, "provider action rejected; re-prompting");
            }
            Err(other) => return Err(other),
        }
        Ok(true)
    }

    /// Run the game loop until a winner is declared.
    pub async fn run(&mut self) -> Result<()> {
        while self.step().await? {}
        Ok(())
    }

    pub fn set_provider(&mut self, provider: impl ActionProvider + 'static) {
        self.provider = Some(Box::new(provider));
    }

    /// Shutdown the runtime gracefully.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    topology: Option<BoardTopology>,
    calibration: Option<Calibration>,
    snapshots: Option<Arc<dyn SnapshotRepository>>,
    provider: Option<Box<dyn ActionProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            topology: None,
            calibration: None,
            snapshots: None,
            provider: None,
        }
    }

    /// Override runtime configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide an explicit initial game state (skips snapshot resume).
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Board graph for a fresh session, e.g. loaded from a layout file.
    /// Defaults to the standard board dealt from the configured seed.
    pub fn topology(mut self, topology: BoardTopology) -> Self {
        self.topology = Some(topology);
        self
    }

    /// Camera calibration for the vision matcher. Defaults to the layout
    /// projection when the table has no measured calibration.
    pub fn calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = Some(calibration);
        self
    }

    /// Snapshot repository. Defaults to in-memory (nothing survives the
    /// process).
    pub fn snapshots(mut self, snapshots: Arc<dyn SnapshotRepository>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    /// Action provider for the game loop (optional; the handle API works
    /// without one).
    pub fn provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime and spawn its worker.
    ///
    /// Initial state resolution: explicit state first, then the latest
    /// snapshot if the repository holds one, then a fresh game dealt from
    /// the configured seed.
    pub fn build(self) -> Result<Runtime> {
        let snapshots: Arc<dyn SnapshotRepository> = self
            .snapshots
            .unwrap_or_else(|| Arc::new(MemorySnapshotRepository::new()));

        let initial_state = match self.state {
            Some(state) => state,
            None => match snapshots.load_latest()? {
                Some((nonce, state)) => {
                    info!(nonce, "resuming from snapshot");
                    state
                }
                None => {
                    let config = &self.config.game_config;
                    let seed = self.config.game_seed;
                    let topology = self
                        .topology
                        .unwrap_or_else(|| standard_topology(seed));
                    GameState::new(topology, seed, config)
                }
            },
        };

        let calibration = self.calibration.unwrap_or_else(default_calibration);
        let matcher = SlotMatcher::new(
            calibration,
            self.config.game_config.reconcile.max_match_distance,
        );
        let reconciler = VisionReconciler::new(matcher, &self.config.game_config.reconcile);

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(
            initial_state,
            self.config.game_config.clone(),
            command_rx,
            event_bus,
            reconciler,
            snapshots,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            provider: self.provider,
            sim_worker_handle,
        })
    }
}
