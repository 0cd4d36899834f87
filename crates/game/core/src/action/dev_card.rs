//! Development card purchase and play.

use serde::{Deserialize, Serialize};

use crate::action::{ActionResult, ActionTransition};
use crate::board::HexId;
use crate::config::{self, GameConfig};
use crate::scoring;
use crate::state::{DevCard, GameState, PlayerId, Resource, ResourceSet, TurnPhase};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DevCardError {
    #[error("cannot use development cards during {phase:?}")]
    WrongPhase { phase: TurnPhase },

    #[error("development deck is empty")]
    DeckEmpty,

    #[error("insufficient resources, need {cost}")]
    InsufficientResources { cost: ResourceSet },

    #[error("{card} is not in hand")]
    CardNotHeld { card: DevCard },

    #[error("a development card was already played this turn")]
    AlreadyPlayedThisTurn,

    #[error("bank cannot supply the requested {resource}")]
    BankShort { resource: Resource },

    #[error("hex does not exist on this board")]
    UnknownHex,

    #[error("resource conservation violated by card effect")]
    ConservationBroken,
}

/// Buys the top card of the deck. The draw is revealed to the owner only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyDevCardAction {
    pub actor: PlayerId,
}

impl ActionTransition for BuyDevCardAction {
    type Error = DevCardError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Action {
            return Err(DevCardError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        if state.bank.dev_deck_size() == 0 {
            return Err(DevCardError::DeckEmpty);
        }
        let cost = config::dev_card_cost();
        if !state.player(self.actor).resources.covers(&cost) {
            return Err(DevCardError::InsufficientResources { cost });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _config: &GameConfig) -> Result<ActionResult, Self::Error> {
        let cost = config::dev_card_cost();
        if !state.player_mut(self.actor).resources.try_remove_all(&cost) {
            return Err(DevCardError::InsufficientResources { cost });
        }
        state.bank.resources.add_all(&cost);

        let card = state.bank.draw_dev_card().ok_or(DevCardError::DeckEmpty)?;
        state.player_mut(self.actor).dev_cards.add(card);

        Ok(ActionResult::DevCardBought {
            card,
            deck_remaining: state.bank.dev_deck_size(),
        })
    }

    fn post_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), Self::Error> {
        if state.resources_conserved(config) {
            Ok(())
        } else {
            Err(DevCardError::ConservationBroken)
        }
    }
}

/// Payload of a card play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevCardPlay {
    /// Counts toward largest army; optionally relocates the robber.
    Knight { robber_to: Option<HexId> },
    /// Grants two road placements that bypass the build cost.
    RoadBuilding,
    /// Takes two chosen resources from the bank; both must be in stock.
    YearOfPlenty { first: Resource, second: Resource },
    /// Drains every opponent's cards of one kind.
    Monopoly { resource: Resource },
}

impl DevCardPlay {
    pub fn card(&self) -> DevCard {
        match self {
            DevCardPlay::Knight { .. } => DevCard::Knight,
            DevCardPlay::RoadBuilding => DevCard::RoadBuilding,
            DevCardPlay::YearOfPlenty { .. } => DevCard::YearOfPlenty,
            DevCardPlay::Monopoly { .. } => DevCard::Monopoly,
        }
    }
}

/// Plays one non-VP card from hand. At most one per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayDevCardAction {
    pub actor: PlayerId,
    pub play: DevCardPlay,
}

impl ActionTransition for PlayDevCardAction {
    type Error = DevCardError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Action {
            return Err(DevCardError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        if state.turn.dev_card_played {
            return Err(DevCardError::AlreadyPlayedThisTurn);
        }
        let card = self.play.card();
        if state.player(self.actor).dev_cards.get(card) == 0 {
            return Err(DevCardError::CardNotHeld { card });
        }
        match self.play {
            DevCardPlay::Knight {
                robber_to: Some(hex),
            } => {
                if hex.0 as usize >= state.topology.hex_count() {
                    return Err(DevCardError::UnknownHex);
                }
            }
            DevCardPlay::YearOfPlenty { first, second } => {
                let mut wanted = ResourceSet::EMPTY;
                wanted.add(first, 1);
                wanted.add(second, 1);
                for (resource, count) in wanted.iter_nonzero() {
                    if state.bank.resources.get(resource) < count {
                        return Err(DevCardError::BankShort { resource });
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, config: &GameConfig) -> Result<ActionResult, Self::Error> {
        let card = self.play.card();
        if !state.player_mut(self.actor).dev_cards.try_remove(card) {
            return Err(DevCardError::CardNotHeld { card });
        }
        state.turn.dev_card_played = true;
        state.bank.discarded_dev_cards.push(card);

        match self.play {
            DevCardPlay::Knight { robber_to } => {
                state.player_mut(self.actor).played_knights += 1;
                if let Some(hex) = robber_to {
                    state.board.robber = Some(hex);
                }
                scoring::refresh_army_bonus(state, config);
            }
            DevCardPlay::RoadBuilding => {
                state.turn.free_roads += 2;
            }
            DevCardPlay::YearOfPlenty { first, second } => {
                for resource in [first, second] {
                    if !state.bank.resources.try_remove(resource, 1) {
                        return Err(DevCardError::BankShort { resource });
                    }
                    state.player_mut(self.actor).resources.add(resource, 1);
                }
            }
            DevCardPlay::Monopoly { resource } => {
                let mut seized = 0;
                for player in PlayerId::ALL {
                    if player == self.actor {
                        continue;
                    }
                    let held = state.player(player).resources.get(resource);
                    if held > 0 && state.player_mut(player).resources.try_remove(resource, held) {
                        seized += held;
                    }
                }
                state
                    .player_mut(self.actor)
                    .resources
                    .add(resource, seized);
            }
        }

        Ok(ActionResult::DevCardPlayed { card })
    }

    fn post_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), Self::Error> {
        if state.resources_conserved(config) {
            Ok(())
        } else {
            Err(DevCardError::ConservationBroken)
        }
    }
}
