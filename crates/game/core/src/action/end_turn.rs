//! Turn handover.

use serde::{Deserialize, Serialize};

use crate::action::{ActionResult, ActionTransition};
use crate::config::GameConfig;
use crate::state::{GameState, PlayerId, TurnPhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EndTurnError {
    #[error("cannot end the turn during {phase:?}")]
    WrongPhase { phase: TurnPhase },

    #[error("discard obligations are still pending")]
    DiscardsPending,
}

/// Ends the active player's turn and hands the dice to the next seat.
///
/// Any open trade offer is abandoned; per-turn card and free-road flags
/// reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndTurnAction {
    pub actor: PlayerId,
}

impl ActionTransition for EndTurnAction {
    type Error = EndTurnError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Action {
            return Err(EndTurnError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        if state.turn.has_pending_discards() {
            return Err(EndTurnError::DiscardsPending);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _config: &GameConfig) -> Result<ActionResult, Self::Error> {
        state.turn.clear_turn_flags();
        let next_player = state.turn.active_player.next();
        state.turn.active_player = next_player;
        state.turn.turn_number += 1;
        state.turn.phase = TurnPhase::Roll;
        Ok(ActionResult::TurnEnded { next_player })
    }
}
