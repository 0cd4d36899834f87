//! Bank trades: propose, then accept or abandon.
//!
//! A proposal records the exchange at the proposer's current harbor rate but
//! moves nothing; only acceptance commits resources. Dropping the offer (a
//! newer proposal, or the end of the turn) therefore has no state effect.

use serde::{Deserialize, Serialize};

use crate::board::HarborKind;
use crate::action::{ActionResult, ActionTransition};
use crate::config::GameConfig;
use crate::state::{GameState, PlayerId, Resource, TradeOffer, TurnPhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    #[error("cannot trade during {phase:?}")]
    WrongPhase { phase: TurnPhase },

    #[error("give and get must differ")]
    SameResource,

    #[error("need {rate} {give} for this exchange")]
    InsufficientResources { give: Resource, rate: u8 },

    #[error("bank has no {resource} left")]
    BankEmpty { resource: Resource },

    #[error("no open trade offer")]
    NoOpenOffer,

    #[error("the open offer belongs to another player")]
    OfferOwnedByOther,

    #[error("resource conservation violated by trade")]
    ConservationBroken,
}

/// Best bank rate available to a player for giving away `give`.
///
/// The configured base rate (4:1) improves to 3:1 with any building on a
/// generic harbor and to 2:1 with a building on a matching resource harbor.
pub fn trade_rate(state: &GameState, config: &GameConfig, player: PlayerId, give: Resource) -> u8 {
    let mut rate = config.base_trade_rate;
    for (vertex, _) in state.board.buildings_of(player) {
        for kind in state.topology.harbors_at(vertex) {
            match kind {
                HarborKind::Generic => rate = rate.min(3),
                HarborKind::Resource(r) if r == give => rate = rate.min(2),
                HarborKind::Resource(_) => {}
            }
        }
    }
    rate
}

/// Opens (or replaces) the turn's bank-trade offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeTradeAction {
    pub actor: PlayerId,
    pub give: Resource,
    pub get: Resource,
}

impl ActionTransition for ProposeTradeAction {
    type Error = TradeError;

    fn pre_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Action {
            return Err(TradeError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        if self.give == self.get {
            return Err(TradeError::SameResource);
        }
        let rate = trade_rate(state, config, self.actor, self.give);
        if state.player(self.actor).resources.get(self.give) < rate {
            return Err(TradeError::InsufficientResources {
                give: self.give,
                rate,
            });
        }
        if state.bank.resources.get(self.get) == 0 {
            return Err(TradeError::BankEmpty {
                resource: self.get,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, config: &GameConfig) -> Result<ActionResult, Self::Error> {
        let offer = TradeOffer {
            player: self.actor,
            give: self.give,
            get: self.get,
            rate: trade_rate(state, config, self.actor, self.give),
        };
        state.turn.trade_offer = Some(offer);
        Ok(ActionResult::TradeProposed { offer })
    }
}

/// Commits the open offer: `rate` units of `give` to the bank for one `get`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptTradeAction {
    pub actor: PlayerId,
}

impl ActionTransition for AcceptTradeAction {
    type Error = TradeError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Action {
            return Err(TradeError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        let offer = state.turn.trade_offer.ok_or(TradeError::NoOpenOffer)?;
        if offer.player != self.actor {
            return Err(TradeError::OfferOwnedByOther);
        }
        if state.player(self.actor).resources.get(offer.give) < offer.rate {
            return Err(TradeError::InsufficientResources {
                give: offer.give,
                rate: offer.rate,
            });
        }
        if state.bank.resources.get(offer.get) == 0 {
            return Err(TradeError::BankEmpty {
                resource: offer.get,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _config: &GameConfig) -> Result<ActionResult, Self::Error> {
        let offer = state.turn.trade_offer.take().ok_or(TradeError::NoOpenOffer)?;

        if !state
            .player_mut(self.actor)
            .resources
            .try_remove(offer.give, offer.rate)
        {
            return Err(TradeError::InsufficientResources {
                give: offer.give,
                rate: offer.rate,
            });
        }
        state.bank.resources.add(offer.give, offer.rate);

        if !state.bank.resources.try_remove(offer.get, 1) {
            return Err(TradeError::BankEmpty {
                resource: offer.get,
            });
        }
        state.player_mut(self.actor).resources.add(offer.get, 1);

        Ok(ActionResult::TradeAccepted { offer })
    }

    fn post_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), Self::Error> {
        if state.resources_conserved(config) {
            Ok(())
        } else {
            Err(TradeError::ConservationBroken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Harbor, VertexId, standard_topology_with_harbors};
    use crate::state::{Building, BuildingKind, PlacementOrigin, TurnState};

    fn trading_state() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let harbors = vec![
            Harbor {
                vertex: VertexId(0),
                kind: HarborKind::Generic,
            },
            Harbor {
                vertex: VertexId(10),
                kind: HarborKind::Resource(Resource::Wood),
            },
        ];
        let mut state = GameState::new(standard_topology_with_harbors(6, harbors), 4, &config);
        state.turn = TurnState {
            phase: TurnPhase::Action,
            setup: None,
            turn_number: 1,
            ..TurnState::new()
        };
        (state, config)
    }

    fn grant(state: &mut GameState, player: PlayerId, resource: Resource, amount: u8) {
        assert!(state.bank.resources.try_remove(resource, amount));
        state.player_mut(player).resources.add(resource, amount);
    }

    fn settle(state: &mut GameState, player: PlayerId, vertex: VertexId) {
        state.board.set_building(
            vertex,
            Building {
                owner: player,
                kind: BuildingKind::Settlement,
                origin: PlacementOrigin::PlayerAction,
            },
        );
    }

    #[test]
    fn default_rate_is_four_to_one() {
        let (mut state, config) = trading_state();
        let actor = PlayerId(0);
        grant(&mut state, actor, Resource::Wood, 4);

        let propose = ProposeTradeAction {
            actor,
            give: Resource::Wood,
            get: Resource::Brick,
        };
        propose.apply(&mut state, &config).unwrap();
        assert_eq!(state.turn.trade_offer.unwrap().rate, 4);

        AcceptTradeAction { actor }.apply(&mut state, &config).unwrap();
        assert_eq!(state.player(actor).resources.get(Resource::Wood), 0);
        assert_eq!(state.player(actor).resources.get(Resource::Brick), 1);
        assert!(state.turn.trade_offer.is_none());
        assert!(state.resources_conserved(&config));
    }

    #[test]
    fn harbors_improve_the_rate() {
        let (mut state, config) = trading_state();
        let actor = PlayerId(1);
        settle(&mut state, actor, VertexId(0)); // generic harbor
        assert_eq!(trade_rate(&state, &config, actor, Resource::Ore), 3);

        settle(&mut state, actor, VertexId(10)); // 2:1 wood harbor
        assert_eq!(trade_rate(&state, &config, actor, Resource::Wood), 2);
        // The resource harbor does not help other kinds.
        assert_eq!(trade_rate(&state, &config, actor, Resource::Ore), 3);
    }

    #[test]
    fn proposal_without_funds_is_rejected() {
        let (mut state, config) = trading_state();
        let actor = PlayerId(0);
        grant(&mut state, actor, Resource::Wood, 3);

        let propose = ProposeTradeAction {
            actor,
            give: Resource::Wood,
            get: Resource::Brick,
        };
        assert!(matches!(
            propose.pre_validate(&state, &config),
            Err(TradeError::InsufficientResources { rate: 4, .. })
        ));
    }

    #[test]
    fn accept_requires_an_open_offer_of_your_own() {
        let (mut state, config) = trading_state();
        let accept = AcceptTradeAction { actor: PlayerId(0) };
        assert_eq!(
            accept.pre_validate(&state, &config),
            Err(TradeError::NoOpenOffer)
        );

        state.turn.trade_offer = Some(TradeOffer {
            player: PlayerId(1),
            give: Resource::Wood,
            get: Resource::Brick,
            rate: 4,
        });
        assert_eq!(
            accept.pre_validate(&state, &config),
            Err(TradeError::OfferOwnedByOther)
        );
    }

    #[test]
    fn abandoned_offer_moves_nothing() {
        let (mut state, config) = trading_state();
        let actor = PlayerId(0);
        grant(&mut state, actor, Resource::Wood, 4);

        ProposeTradeAction {
            actor,
            give: Resource::Wood,
            get: Resource::Brick,
        }
        .apply(&mut state, &config)
        .unwrap();

        // A newer proposal replaces the offer; nothing has moved.
        ProposeTradeAction {
            actor,
            give: Resource::Wood,
            get: Resource::Sheep,
        }
        .apply(&mut state, &config)
        .unwrap();

        assert_eq!(state.player(actor).resources.get(Resource::Wood), 4);
        assert_eq!(state.turn.trade_offer.unwrap().get, Resource::Sheep);
        assert!(state.resources_conserved(&config));
    }
}
