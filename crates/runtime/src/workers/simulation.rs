//! Simulation worker that owns the authoritative [`game_core::GameState`].
//!
//! The worker is the single writer: player actions, runtime-driven system
//! actions, and accepted vision corrections all commit through its engine
//! calls, one command at a time. Observation batches are queued on arrival
//! and reconciled only at synchronization points, never mid-action.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use game_core::{
    Action, ActionResult, DeclareWinnerAction, ExecutionOutcome, GameConfig, GameEngine,
    GameState, PlayerActionKind, ProduceAction, SystemActionKind, TurnPhase, scoring,
};

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, GameEvent, ReconciliationEvent, TurnEvent};
use crate::repository::SnapshotRepository;
use crate::vision::{ObservationBatch, ReconcileOutcome, VisionReconciler};

/// Commands processed by the simulation worker.
pub enum Command {
    /// Execute a player action (system actions are runtime-internal).
    ExecuteAction {
        kind: PlayerActionKind,
        reply: oneshot::Sender<Result<ExecutionOutcome>>,
    },
    /// Queue an observation batch. Enqueue-only; nothing is applied here.
    SubmitObservations { batch: ObservationBatch },
    /// Drain the observation queue against the state now.
    Reconcile {
        reply: oneshot::Sender<Vec<ReconcileOutcome>>,
    },
    /// Read-only state snapshot.
    QueryState { reply: oneshot::Sender<GameState> },
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    state: GameState,
    config: GameConfig,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    reconciler: VisionReconciler,
    snapshots: Arc<dyn SnapshotRepository>,
}

impl SimulationWorker {
    pub fn new(
        state: GameState,
        config: GameConfig,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        reconciler: VisionReconciler,
        snapshots: Arc<dyn SnapshotRepository>,
    ) -> Self {
        info!(
            nonce = state.nonce(),
            phase = ?state.turn.phase,
            "simulation worker initialized"
        );
        Self {
            state,
            config,
            command_rx,
            event_bus,
            reconciler,
            snapshots,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!("simulation worker shutting down");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::ExecuteAction { kind, reply } => {
                let result = self.handle_player_action(kind);
                if reply.send(result).is_err() {
                    debug!("ExecuteAction reply channel closed (caller dropped)");
                }
            }
            Command::SubmitObservations { batch } => {
                self.reconciler.enqueue(batch);
            }
            Command::Reconcile { reply } => {
                let outcomes = self.reconcile_now();
                self.check_winner();
                self.persist();
                if reply.send(outcomes).is_err() {
                    debug!("Reconcile reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Full player-action workflow: execute, publish, run the phase
    /// cascade, reconcile at the end-of-turn sync point, snapshot.
    fn handle_player_action(&mut self, kind: PlayerActionKind) -> Result<ExecutionOutcome> {
        let action = Action::Player(kind);
        let outcome = match self.execute(&action) {
            Ok(outcome) => outcome,
            Err(error) => return Err(RuntimeError::Action(error)),
        };

        self.publish_turn_events(&action, &outcome.result);
        let turn_over = matches!(outcome.result, ActionResult::TurnEnded { .. });

        // Production follows a committed non-7 roll immediately.
        self.run_production();

        // End of turn is a synchronization point for queued observations.
        if turn_over {
            let outcomes = self.reconcile_now();
            if !outcomes.is_empty() {
                debug!(count = outcomes.len(), "reconciled at end of turn");
            }
            self.event_bus.publish(Event::Turn(TurnEvent::TurnStarted {
                player: self.state.turn.active_player,
                turn_number: self.state.turn.turn_number,
            }));
        }

        self.check_winner();
        self.persist();

        Ok(outcome)
    }

    /// The only call site of [`GameEngine::execute`]; publishes the commit
    /// or rejection event for every action, player and system alike.
    fn execute(
        &mut self,
        action: &Action,
    ) -> std::result::Result<ExecutionOutcome, game_core::ExecuteError> {
        let mut engine = GameEngine::new(&mut self.state);
        match engine.execute(&self.config, action) {
            Ok(outcome) => {
                self.event_bus.publish(Event::Game(GameEvent::ActionExecuted {
                    nonce: outcome.nonce,
                    action: action.clone(),
                    result: outcome.result.clone(),
                }));
                Ok(outcome)
            }
            Err(error) => {
                if error.is_rejection() {
                    debug!(
                        action = action.kind_name(),
                        error = %error,
                        "action rejected"
                    );
                } else {
                    error!(
                        action = action.kind_name(),
                        error = %error,
                        "action failed mid-pipeline"
                    );
                }
                self.event_bus.publish(Event::Game(GameEvent::ActionRejected {
                    action: action.clone(),
                    phase: error.phase().map(|p| p.as_str().to_string()),
                    reason: error.to_string(),
                }));
                Err(error)
            }
        }
    }

    /// Drive the production system action while the phase calls for it.
    fn run_production(&mut self) {
        while self.state.turn.phase == TurnPhase::Production {
            let action = Action::System(SystemActionKind::Produce(ProduceAction));
            match self.execute(&action) {
                Ok(outcome) => {
                    if let ActionResult::Production(summary) = outcome.result {
                        self.event_bus
                            .publish(Event::Turn(TurnEvent::ResourcesProduced { summary }));
                    }
                }
                Err(error) => {
                    error!(error = %error, "production payout failed");
                    break;
                }
            }
        }
    }

    /// Drain queued observations and publish the outcomes.
    fn reconcile_now(&mut self) -> Vec<ReconcileOutcome> {
        let outcomes = self.reconciler.drain(&mut self.state, &self.config);
        for outcome in &outcomes {
            let event = match outcome {
                ReconcileOutcome::Applied { nonce, slot, owner } => {
                    ReconciliationEvent::CorrectionApplied {
                        nonce: *nonce,
                        slot: *slot,
                        owner: *owner,
                    }
                }
                ReconcileOutcome::Conflict(conflict) => {
                    ReconciliationEvent::Conflict(conflict.clone())
                }
            };
            self.event_bus.publish(Event::Reconciliation(event));
        }
        outcomes
    }

    /// Declare the winner once a recomputation confirms the target score.
    fn check_winner(&mut self) {
        if self.state.turn.phase == TurnPhase::Ended {
            return;
        }
        let Some((player, points)) = scoring::winner(&self.state, &self.config) else {
            return;
        };
        let action = Action::System(SystemActionKind::DeclareWinner(DeclareWinnerAction {
            player,
        }));
        match self.execute(&action) {
            Ok(outcome) => {
                info!(%player, points, "winner declared");
                self.event_bus.publish(Event::Game(GameEvent::WinnerDeclared {
                    nonce: outcome.nonce,
                    player,
                    points,
                }));
            }
            Err(error) => {
                error!(error = %error, "winner declaration failed");
            }
        }
    }

    /// Snapshot the state after a committed batch. One immediate retry; a
    /// second failure is surfaced and play continues in memory.
    fn persist(&mut self) {
        let nonce = self.state.nonce();
        if let Err(first) = self.snapshots.save(nonce, &self.state) {
            warn!(nonce, error = %first, "snapshot write failed, retrying once");
            if let Err(second) = self.snapshots.save(nonce, &self.state) {
                error!(nonce, error = %second, "snapshot retry failed; continuing in memory");
                self.event_bus.publish(Event::Game(GameEvent::SnapshotFailed {
                    nonce,
                    error: second.to_string(),
                }));
            }
        }
    }

    /// Turn-flow notifications derived from a committed player action.
    fn publish_turn_events(&self, action: &Action, result: &ActionResult) {
        match result {
            ActionResult::DiceRolled {
                dice,
                discards_owed,
            } => {
                if let Some(player) = action.actor() {
                    self.event_bus.publish(Event::Turn(TurnEvent::DiceRolled {
                        player,
                        dice: *dice,
                        discards_owed: discards_owed.clone(),
                    }));
                }
            }
            ActionResult::TurnEnded { next_player } => {
                if let Some(player) = action.actor() {
                    self.event_bus.publish(Event::Turn(TurnEvent::TurnEnded {
                        player,
                        next_player: *next_player,
                    }));
                }
            }
            ActionResult::SetupPlaced { .. } => {
                // The last setup placement rolls straight into turn one.
                if self.state.turn.setup.is_none()
                    && self.state.turn.phase == TurnPhase::Roll
                    && self.state.turn.turn_number == 1
                {
                    self.event_bus.publish(Event::Turn(TurnEvent::TurnStarted {
                        player: self.state.turn.active_player,
                        turn_number: 1,
                    }));
                }
            }
            _ => {}
        }
    }
}
