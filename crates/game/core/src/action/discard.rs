//! Discarding down after a 7.

use serde::{Deserialize, Serialize};

use crate::action::{ActionResult, ActionTransition};
use crate::config::GameConfig;
use crate::state::{GameState, PlayerId, ResourceSet, TurnPhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiscardError {
    #[error("cannot discard during {phase:?}")]
    WrongPhase { phase: TurnPhase },

    #[error("no discard owed")]
    NoDiscardOwed,

    #[error("must discard exactly {owed} cards, got {offered}")]
    WrongCount { owed: u8, offered: u32 },

    #[error("selected cards are not all in hand")]
    CardsNotHeld,

    #[error("resource conservation violated by discard")]
    ConservationBroken,
}

/// Returns the selected cards to the bank.
///
/// Which cards to give up is the player's choice; the engine only enforces
/// that the count matches the obligation exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardAction {
    pub actor: PlayerId,
    pub cards: ResourceSet,
}

impl ActionTransition for DiscardAction {
    type Error = DiscardError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Discard {
            return Err(DiscardError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        let owed = state.turn.owed_discards(self.actor);
        if owed == 0 {
            return Err(DiscardError::NoDiscardOwed);
        }
        let offered = self.cards.total();
        if offered != owed as u32 {
            return Err(DiscardError::WrongCount { owed, offered });
        }
        if !state.player(self.actor).resources.covers(&self.cards) {
            return Err(DiscardError::CardsNotHeld);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _config: &GameConfig) -> Result<ActionResult, Self::Error> {
        if !state
            .player_mut(self.actor)
            .resources
            .try_remove_all(&self.cards)
        {
            return Err(DiscardError::CardsNotHeld);
        }
        state.bank.resources.add_all(&self.cards);
        state.turn.pending_discards[self.actor.index()] = 0;

        if !state.turn.has_pending_discards() {
            state.turn.phase = TurnPhase::Action;
        }

        Ok(ActionResult::Discarded {
            player: self.actor,
            returned: self.cards,
        })
    }

    fn post_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), Self::Error> {
        if state.resources_conserved(config) {
            Ok(())
        } else {
            Err(DiscardError::ConservationBroken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::standard_topology;
    use crate::state::{Resource, TurnState};

    fn discard_state() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(standard_topology(3), 6, &config);
        state.turn = TurnState {
            phase: TurnPhase::Discard,
            setup: None,
            turn_number: 2,
            ..TurnState::new()
        };

        // Player 1 holds nine cards and owes four of them.
        let mut hand = ResourceSet::EMPTY;
        hand.add(Resource::Wood, 5);
        hand.add(Resource::Ore, 4);
        assert!(state.bank.resources.try_remove_all(&hand));
        state.player_mut(PlayerId(1)).resources.add_all(&hand);
        state.turn.pending_discards[1] = 4;
        (state, config)
    }

    #[test]
    fn exact_count_is_enforced() {
        let (state, config) = discard_state();
        let short = DiscardAction {
            actor: PlayerId(1),
            cards: ResourceSet::from_pairs(&[(Resource::Wood, 3)]),
        };
        assert_eq!(
            short.pre_validate(&state, &config),
            Err(DiscardError::WrongCount {
                owed: 4,
                offered: 3
            })
        );
    }

    #[test]
    fn player_without_obligation_cannot_discard() {
        let (state, config) = discard_state();
        let action = DiscardAction {
            actor: PlayerId(0),
            cards: ResourceSet::from_pairs(&[(Resource::Wood, 1)]),
        };
        assert_eq!(
            action.pre_validate(&state, &config),
            Err(DiscardError::NoDiscardOwed)
        );
    }

    #[test]
    fn discard_returns_cards_and_releases_the_phase() {
        let (mut state, config) = discard_state();
        let action = DiscardAction {
            actor: PlayerId(1),
            cards: ResourceSet::from_pairs(&[(Resource::Wood, 2), (Resource::Ore, 2)]),
        };
        assert!(action.pre_validate(&state, &config).is_ok());
        action.apply(&mut state, &config).unwrap();

        assert_eq!(state.player(PlayerId(1)).hand_size(), 5);
        assert_eq!(state.turn.owed_discards(PlayerId(1)), 0);
        assert_eq!(state.turn.phase, TurnPhase::Action);
        assert!(state.resources_conserved(&config));
    }

    #[test]
    fn phase_stays_discard_while_others_owe() {
        let (mut state, config) = discard_state();
        state.turn.pending_discards[2] = 4;

        DiscardAction {
            actor: PlayerId(1),
            cards: ResourceSet::from_pairs(&[(Resource::Wood, 4)]),
        }
        .apply(&mut state, &config)
        .unwrap();

        assert_eq!(state.turn.phase, TurnPhase::Discard);
        assert!(state.turn.has_pending_discards());
    }
}
