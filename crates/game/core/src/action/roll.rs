//! Dice roll at the start of a turn.

use serde::{Deserialize, Serialize};

use crate::action::{ActionResult, ActionTransition};
use crate::config::GameConfig;
use crate::rng::{PcgRng, compute_seed};
use crate::state::{DiceRoll, GameState, PlayerId, TurnPhase};

/// Seed contexts for the two dice.
const DIE_1_CONTEXT: u32 = 1;
const DIE_2_CONTEXT: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RollError {
    #[error("cannot roll during {phase:?}")]
    WrongPhase { phase: TurnPhase },

    #[error("die value {value} out of range")]
    InvalidDie { value: u8 },
}

/// Commits a dice total and routes the turn into production or discards.
///
/// The physical table may report real dice via `dice`; when absent, the
/// result is derived deterministically from the game seed and nonce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollAction {
    pub actor: PlayerId,
    /// Externally supplied dice, if the hardware rolled them.
    pub dice: Option<DiceRoll>,
}

impl RollAction {
    pub fn new(actor: PlayerId) -> Self {
        Self { actor, dice: None }
    }

    pub fn with_dice(actor: PlayerId, dice: DiceRoll) -> Self {
        Self {
            actor,
            dice: Some(dice),
        }
    }
}

impl ActionTransition for RollAction {
    type Error = RollError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Roll {
            return Err(RollError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        if let Some(dice) = self.dice {
            for value in [dice.die_1, dice.die_2] {
                if !(1..=6).contains(&value) {
                    return Err(RollError::InvalidDie { value });
                }
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, config: &GameConfig) -> Result<ActionResult, Self::Error> {
        let dice = self.dice.unwrap_or_else(|| {
            let die_1 =
                PcgRng::roll_die(compute_seed(state.game_seed, state.nonce(), DIE_1_CONTEXT), 6);
            let die_2 =
                PcgRng::roll_die(compute_seed(state.game_seed, state.nonce(), DIE_2_CONTEXT), 6);
            DiceRoll::new(die_1 as u8, die_2 as u8)
        });

        state.turn.dice = Some(dice);

        let mut discards_owed = Vec::new();
        if dice.triggers_discards() {
            // No production on a 7; collect obligations from oversized hands.
            for player in &state.players {
                let hand = player.hand_size();
                if hand > config.discard_hand_limit as u32 {
                    let owed = (hand / 2) as u8;
                    state.turn.pending_discards[player.id.index()] = owed;
                    discards_owed.push((player.id, owed));
                }
            }
            state.turn.phase = if discards_owed.is_empty() {
                TurnPhase::Action
            } else {
                TurnPhase::Discard
            };
        } else {
            state.turn.phase = TurnPhase::Production;
        }

        Ok(ActionResult::DiceRolled {
            dice,
            discards_owed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::standard_topology;
    use crate::state::{Resource, TurnState};

    fn rolling_state() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(standard_topology(1), 9, &config);
        state.turn = TurnState {
            phase: TurnPhase::Roll,
            setup: None,
            turn_number: 1,
            ..TurnState::new()
        };
        (state, config)
    }

    #[test]
    fn rejects_outside_roll_phase() {
        let (mut state, config) = rolling_state();
        state.turn.phase = TurnPhase::Action;
        let action = RollAction::new(PlayerId(0));
        assert!(matches!(
            action.pre_validate(&state, &config),
            Err(RollError::WrongPhase { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_dice() {
        let (state, config) = rolling_state();
        let action = RollAction::with_dice(PlayerId(0), DiceRoll::new(7, 1));
        assert!(matches!(
            action.pre_validate(&state, &config),
            Err(RollError::InvalidDie { value: 7 })
        ));
    }

    #[test]
    fn non_seven_moves_to_production() {
        let (mut state, config) = rolling_state();
        let action = RollAction::with_dice(PlayerId(0), DiceRoll::new(2, 3));
        action.apply(&mut state, &config).unwrap();
        assert_eq!(state.turn.phase, TurnPhase::Production);
        assert_eq!(state.turn.dice, Some(DiceRoll::new(2, 3)));
    }

    #[test]
    fn seven_with_no_big_hands_skips_discards() {
        let (mut state, config) = rolling_state();
        let action = RollAction::with_dice(PlayerId(0), DiceRoll::new(3, 4));
        action.apply(&mut state, &config).unwrap();
        assert_eq!(state.turn.phase, TurnPhase::Action);
        assert!(!state.turn.has_pending_discards());
    }

    #[test]
    fn seven_charges_half_of_oversized_hands() {
        let (mut state, config) = rolling_state();
        state
            .player_mut(PlayerId(1))
            .resources
            .add(Resource::Wood, 9);

        let action = RollAction::with_dice(PlayerId(0), DiceRoll::new(3, 4));
        let result = action.apply(&mut state, &config).unwrap();

        assert_eq!(state.turn.phase, TurnPhase::Discard);
        assert_eq!(state.turn.owed_discards(PlayerId(1)), 4);
        assert!(matches!(
            result,
            ActionResult::DiceRolled { discards_owed, .. } if discards_owed == vec![(PlayerId(1), 4)]
        ));
    }

    #[test]
    fn generated_dice_are_deterministic() {
        let (mut a, config) = rolling_state();
        let (mut b, _) = rolling_state();
        RollAction::new(PlayerId(0)).apply(&mut a, &config).unwrap();
        RollAction::new(PlayerId(0)).apply(&mut b, &config).unwrap();
        assert_eq!(a.turn.dice, b.turn.dice);
    }
}
