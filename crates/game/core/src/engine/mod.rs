//! Action execution pipeline.
//!
//! The [`GameEngine`] is the single mutation entry point for
//! [`GameState`]. Player actions and system actions (production, vision
//! corrections, winner declaration) all commit through the same
//! `pre_validate → apply → post_validate` pipeline, so every committed
//! transition is validated, versioned, and atomic.

mod errors;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::{Action, ActionResult, PlayerActionKind};
use crate::config::GameConfig;
use crate::state::{GameState, TurnPhase};

/// Outcome of a committed action.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionOutcome {
    /// State version after the commit.
    pub nonce: u64,
    /// Action-specific result data for event construction.
    pub result: ActionResult,
}

/// Authoritative reducer over a game state.
///
/// Rejected actions leave the state byte-for-byte unchanged: the pipeline
/// runs against a working copy that is only swapped in after every phase
/// succeeded.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Executes an action through the transition pipeline.
    ///
    /// Enforces turn ownership before anything else: a player action must
    /// come from the active seat, except discards, which any seat with an
    /// obligation may submit while the table resolves a 7.
    pub fn execute(
        &mut self,
        config: &GameConfig,
        action: &Action,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        self.validate_actor(action)?;

        let mut working = self.state.clone();
        let result = transition::execute_transition(action, &mut working, config)?;
        working.bump_nonce();
        *self.state = working;

        Ok(ExecutionOutcome {
            nonce: self.state.nonce(),
            result,
        })
    }

    fn validate_actor(&self, action: &Action) -> Result<(), ExecuteError> {
        if self.state.turn.phase == TurnPhase::Ended {
            return Err(ExecuteError::GameOver);
        }
        match action {
            // System actions carry no seat; the runtime is trusted to drive
            // them at the right points.
            Action::System(_) => Ok(()),
            // Discards come from whichever seats owe them, not the active
            // player; the transition checks the obligation itself.
            Action::Player(PlayerActionKind::Discard(_)) => Ok(()),
            Action::Player(kind) => {
                let actor = kind.actor();
                let active = self.state.turn.active_player;
                if actor != active {
                    return Err(ExecuteError::NotPlayersTurn { actor, active });
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{EndTurnAction, RollAction};
    use crate::board::standard_topology;
    use crate::state::{DiceRoll, PlayerId, TurnState};

    fn rolling_state() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(standard_topology(1), 21, &config);
        state.turn = TurnState {
            phase: TurnPhase::Roll,
            setup: None,
            turn_number: 1,
            ..TurnState::new()
        };
        (state, config)
    }

    #[test]
    fn wrong_seat_is_rejected_before_validation() {
        let (mut state, config) = rolling_state();
        let mut engine = GameEngine::new(&mut state);

        let action = Action::Player(PlayerActionKind::Roll(RollAction::new(PlayerId(1))));
        assert_eq!(
            engine.execute(&config, &action),
            Err(ExecuteError::NotPlayersTurn {
                actor: PlayerId(1),
                active: PlayerId(0)
            })
        );
    }

    #[test]
    fn commit_increments_the_nonce() {
        let (mut state, config) = rolling_state();
        let mut engine = GameEngine::new(&mut state);

        let action = Action::Player(PlayerActionKind::Roll(RollAction::with_dice(
            PlayerId(0),
            DiceRoll::new(1, 2),
        )));
        let outcome = engine.execute(&config, &action).unwrap();
        assert_eq!(outcome.nonce, 1);
        assert_eq!(state.nonce(), 1);
    }

    #[test]
    fn rejected_action_leaves_state_and_nonce_untouched() {
        let (mut state, config) = rolling_state();
        let before = state.clone();
        let mut engine = GameEngine::new(&mut state);

        // Ending the turn is illegal during the roll phase.
        let action = Action::Player(PlayerActionKind::EndTurn(EndTurnAction {
            actor: PlayerId(0),
        }));
        assert!(engine.execute(&config, &action).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn nothing_executes_after_the_game_ends() {
        let (mut state, config) = rolling_state();
        state.turn.phase = TurnPhase::Ended;
        let mut engine = GameEngine::new(&mut state);

        let action = Action::Player(PlayerActionKind::Roll(RollAction::new(PlayerId(0))));
        assert_eq!(engine.execute(&config, &action), Err(ExecuteError::GameOver));
    }
}
