//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides the channel plumbing and offers async helpers
//! for submitting actions, feeding observations, and streaming events.

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{ExecutionOutcome, GameState, PlayerActionKind};

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::vision::{ObservationBatch, ReconcileOutcome};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Execute a player action and wait for the commit (or rejection).
    pub async fn execute_action(&self, kind: PlayerActionKind) -> Result<ExecutionOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::ExecuteAction {
                kind,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Queue a camera observation batch. Returns as soon as the batch is
    /// enqueued; nothing is applied until the next synchronization point.
    pub async fn submit_observations(&self, batch: ObservationBatch) -> Result<()> {
        self.command_tx
            .send(Command::SubmitObservations { batch })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Force a reconciliation pass now and collect the outcomes.
    pub async fn reconcile(&self) -> Result<Vec<ReconcileOutcome>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Reconcile { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Query the current game state (read-only snapshot).
    pub async fn query_state(&self) -> Result<GameState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from one topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// The underlying event bus, for advanced consumers.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
