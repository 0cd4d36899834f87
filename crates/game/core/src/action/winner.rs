//! Winner declaration.

use serde::{Deserialize, Serialize};

use crate::action::{ActionResult, ActionTransition};
use crate::config::GameConfig;
use crate::scoring;
use crate::state::{GameState, PlayerId, TurnPhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WinnerError {
    #[error("the game has already ended")]
    GameAlreadyOver,

    #[error("{player} has {points} points, below the target")]
    ThresholdNotReached { player: PlayerId, points: u8 },
}

/// Ends the game once a recomputation confirms the target score.
///
/// The runtime proposes this after every committed batch; the transition
/// re-derives the score so a stale proposal can never end the game early.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclareWinnerAction {
    pub player: PlayerId,
}

impl ActionTransition for DeclareWinnerAction {
    type Error = WinnerError;

    fn pre_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase == TurnPhase::Ended {
            return Err(WinnerError::GameAlreadyOver);
        }
        let points = scoring::victory_points(state, self.player);
        if points < config.target_victory_points {
            return Err(WinnerError::ThresholdNotReached {
                player: self.player,
                points,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _config: &GameConfig) -> Result<ActionResult, Self::Error> {
        state.turn.phase = TurnPhase::Ended;
        Ok(ActionResult::WinnerDeclared {
            player: self.player,
            points: scoring::victory_points(state, self.player),
        })
    }
}
