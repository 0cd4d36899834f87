//! Topic-based event bus.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use serde::{Deserialize, Serialize};

use super::types::{GameEvent, ReconciliationEvent, TurnEvent};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// State commits, rejections, winner, persistence warnings.
    Game,
    /// Turn flow notifications.
    Turn,
    /// Vision reconciliation outcomes.
    Reconciliation,
}

/// Event wrapper carrying the topic and typed payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Game(GameEvent),
    Turn(TurnEvent),
    Reconciliation(ReconciliationEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Game(_) => Topic::Game,
            Event::Turn(_) => Topic::Turn,
            Event::Reconciliation(_) => Topic::Reconciliation,
        }
    }
}

/// Topic-based event bus.
///
/// Consumers subscribe to the topics they care about; publishing is
/// best-effort and never blocks the simulation.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<Event>>>>,
}

impl EventBus {
    const TOPICS: [Topic; 3] = [Topic::Game, Topic::Turn, Topic::Reconciliation];

    /// Creates a new event bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with the given capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        for topic in Self::TOPICS {
            channels.insert(topic, broadcast::channel(capacity).0);
        }
        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publish an event to its topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        // try_read to avoid blocking in async context; events are
        // best-effort.
        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic)
                    && tx.send(event).is_err()
                {
                    // No subscribers for this topic. Normal, not an error.
                    tracing::trace!("no subscribers for topic {:?}", topic);
                }
            }
            Err(_) => {
                tracing::debug!("failed to acquire event bus lock for topic {:?}", topic);
            }
        }
    }

    /// Subscribe to a single topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        let channels = self
            .channels
            .try_read()
            .expect("event bus channels are only written at construction");
        channels
            .get(&topic)
            .expect("all topics are pre-created")
            .subscribe()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
