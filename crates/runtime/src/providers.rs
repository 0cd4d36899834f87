//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so the game
//! loop can run with human input, scripted fixtures, or tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use game_core::{GameState, PlayerActionKind, PlayerId};

use crate::error::{Result, RuntimeError};

/// Provides the next action for a seat based on the current game state.
///
/// Implementations may block (awaiting hardware input) but must never touch
/// the state; they only read the snapshot they are handed.
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Produce an action for `seat` given a read-only state snapshot.
    async fn provide_action(&self, seat: PlayerId, state: &GameState) -> Result<PlayerActionKind>;
}

/// Replays a fixed sequence of actions. Useful for tests and demos.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<PlayerActionKind>>,
}

impl ScriptedProvider {
    pub fn new(actions: impl IntoIterator<Item = PlayerActionKind>) -> Self {
        Self {
            script: Mutex::new(actions.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn provide_action(
        &self,
        _seat: PlayerId,
        _state: &GameState,
    ) -> Result<PlayerActionKind> {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .ok_or(RuntimeError::ScriptExhausted)
    }
}
