//! Resource payout after a non-7 roll.

use serde::{Deserialize, Serialize};

use crate::action::{ActionResult, ActionTransition};
use crate::config::GameConfig;
use crate::state::{GameState, PlayerId, Resource, ResourceSet, TurnPhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProduceError {
    #[error("cannot produce during {phase:?}")]
    WrongPhase { phase: TurnPhase },

    #[error("no dice committed for this turn")]
    MissingDice,

    #[error("bank stock underflow while paying out")]
    BankUnderflow,

    #[error("resource conservation violated by payout")]
    ConservationBroken,
}

/// Per-seat payouts of one production event, plus the kinds withheld because
/// the bank could not cover every claimant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionSummary {
    pub roll: u8,
    pub payouts: [ResourceSet; PlayerId::COUNT],
    /// Kinds with demand this round that nobody received.
    pub withheld: Vec<Resource>,
}

impl ProductionSummary {
    pub fn payout(&self, player: PlayerId) -> &ResourceSet {
        &self.payouts[player.index()]
    }
}

/// System transition crediting hex production for the committed roll.
///
/// Payout is all-or-nothing per resource kind: demand for each kind is
/// summed across every adjacent settlement and city first, and a kind the
/// bank cannot fully cover is withheld from everyone this round. The hex
/// under the robber never produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceAction;

impl ActionTransition for ProduceAction {
    type Error = ProduceError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Production {
            return Err(ProduceError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        if state.turn.dice.is_none() {
            return Err(ProduceError::MissingDice);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _config: &GameConfig) -> Result<ActionResult, Self::Error> {
        let roll = state.turn.dice.ok_or(ProduceError::MissingDice)?.total();

        // First pass: total demand per seat and per kind.
        let mut demand = [ResourceSet::EMPTY; PlayerId::COUNT];
        for (hex_id, hex) in state.topology.hexes() {
            if hex.roll_number != Some(roll) {
                continue;
            }
            if state.board.robber == Some(hex_id) {
                continue;
            }
            let Some(resource) = hex.terrain.resource() else {
                continue;
            };
            for vertex in hex.vertices {
                if let Some(building) = state.board.building(vertex) {
                    demand[building.owner.index()].add(resource, building.kind.production_yield());
                }
            }
        }

        // Second pass: fulfil each kind entirely or not at all.
        let mut payouts = [ResourceSet::EMPTY; PlayerId::COUNT];
        let mut withheld = Vec::new();
        for resource in Resource::ALL {
            let total: u32 = demand.iter().map(|d| d.get(resource) as u32).sum();
            if total == 0 {
                continue;
            }
            if (state.bank.resources.get(resource) as u32) < total {
                withheld.push(resource);
                continue;
            }
            for player in PlayerId::ALL {
                let amount = demand[player.index()].get(resource);
                if amount == 0 {
                    continue;
                }
                if !state.bank.resources.try_remove(resource, amount) {
                    return Err(ProduceError::BankUnderflow);
                }
                state.player_mut(player).resources.add(resource, amount);
                payouts[player.index()].add(resource, amount);
            }
        }

        state.turn.phase = TurnPhase::Action;

        Ok(ActionResult::Production(ProductionSummary {
            roll,
            payouts,
            withheld,
        }))
    }

    fn post_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), Self::Error> {
        if state.resources_conserved(config) {
            Ok(())
        } else {
            Err(ProduceError::ConservationBroken)
        }
    }
}
