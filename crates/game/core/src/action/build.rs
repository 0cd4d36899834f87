//! Road, settlement, and city construction.

use serde::{Deserialize, Serialize};

use crate::action::{ActionResult, ActionTransition};
use crate::board::{EdgeId, VertexId};
use crate::config::{self, GameConfig};
use crate::scoring;
use crate::state::{
    Building, BuildingKind, GameState, PlacementOrigin, PlayerId, ResourceSet, RoadPiece,
    TurnPhase,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("cannot build during {phase:?}")]
    WrongPhase { phase: TurnPhase },

    #[error("slot does not exist on this board")]
    UnknownSlot,

    #[error("slot is already occupied")]
    SlotOccupied,

    #[error("a neighboring vertex already carries a building")]
    SpacingViolated,

    #[error("no own road or building connects to this slot")]
    NotConnected,

    #[error("no settlement to upgrade at this vertex")]
    NoSettlementToUpgrade,

    #[error("settlement at this vertex belongs to another player")]
    NotYourSettlement,

    #[error("insufficient resources, need {cost}")]
    InsufficientResources { cost: ResourceSet },

    #[error("resource conservation violated by build")]
    ConservationBroken,
}

/// True if `player` may extend a road onto `edge`: one endpoint carries
/// their building, or one of their roads meets an endpoint that is not
/// blocked by an opposing building.
fn road_connects(state: &GameState, player: PlayerId, edge: EdgeId) -> bool {
    let endpoints = state.topology.edge(edge);
    for vertex in [endpoints.a, endpoints.b] {
        match state.board.building(vertex) {
            Some(building) if building.owner == player => return true,
            // Opposing buildings cut road networks at this vertex.
            Some(_) => continue,
            None => {}
        }
        let reaches = state
            .topology
            .edges_at(vertex)
            .iter()
            .any(|&e| e != edge && state.board.road(e).is_some_and(|r| r.owner == player));
        if reaches {
            return true;
        }
    }
    false
}

fn charge(state: &mut GameState, player: PlayerId, cost: &ResourceSet) -> Result<(), BuildError> {
    if !state.player_mut(player).resources.try_remove_all(cost) {
        return Err(BuildError::InsufficientResources { cost: *cost });
    }
    state.bank.resources.add_all(cost);
    Ok(())
}

fn conserved(state: &GameState, config: &GameConfig) -> Result<(), BuildError> {
    if state.resources_conserved(config) {
        Ok(())
    } else {
        Err(BuildError::ConservationBroken)
    }
}

/// Places a road, paying the cost unless Road Building granted free ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRoadAction {
    pub actor: PlayerId,
    pub edge: EdgeId,
}

impl ActionTransition for BuildRoadAction {
    type Error = BuildError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Action {
            return Err(BuildError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        if !state.topology.contains_edge(self.edge) {
            return Err(BuildError::UnknownSlot);
        }
        if state.board.road(self.edge).is_some() {
            return Err(BuildError::SlotOccupied);
        }
        if !road_connects(state, self.actor, self.edge) {
            return Err(BuildError::NotConnected);
        }
        if state.turn.free_roads == 0 {
            let cost = config::road_cost();
            if !state.player(self.actor).resources.covers(&cost) {
                return Err(BuildError::InsufficientResources { cost });
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, config: &GameConfig) -> Result<ActionResult, Self::Error> {
        if state.turn.free_roads > 0 {
            state.turn.free_roads -= 1;
        } else {
            charge(state, self.actor, &config::road_cost())?;
        }
        state.board.set_road(
            self.edge,
            RoadPiece {
                owner: self.actor,
                origin: PlacementOrigin::PlayerAction,
            },
        );
        scoring::refresh_road_bonus(state, config);
        Ok(ActionResult::RoadBuilt { edge: self.edge })
    }

    fn post_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), Self::Error> {
        conserved(state, config)
    }
}

/// Places a settlement under the distance and connectivity rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettlementAction {
    pub actor: PlayerId,
    pub vertex: VertexId,
}

impl ActionTransition for BuildSettlementAction {
    type Error = BuildError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Action {
            return Err(BuildError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        if !state.topology.contains_vertex(self.vertex) {
            return Err(BuildError::UnknownSlot);
        }
        if state.board.building(self.vertex).is_some() {
            return Err(BuildError::SlotOccupied);
        }
        if !state.board.respects_spacing(&state.topology, self.vertex) {
            return Err(BuildError::SpacingViolated);
        }
        let has_road = state
            .topology
            .edges_at(self.vertex)
            .iter()
            .any(|&e| state.board.road(e).is_some_and(|r| r.owner == self.actor));
        if !has_road {
            return Err(BuildError::NotConnected);
        }
        let cost = config::settlement_cost();
        if !state.player(self.actor).resources.covers(&cost) {
            return Err(BuildError::InsufficientResources { cost });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, config: &GameConfig) -> Result<ActionResult, Self::Error> {
        charge(state, self.actor, &config::settlement_cost())?;
        state.board.set_building(
            self.vertex,
            Building {
                owner: self.actor,
                kind: BuildingKind::Settlement,
                origin: PlacementOrigin::PlayerAction,
            },
        );
        // A new settlement can sever an opposing road network.
        scoring::refresh_road_bonus(state, config);
        Ok(ActionResult::SettlementBuilt {
            vertex: self.vertex,
        })
    }

    fn post_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), Self::Error> {
        conserved(state, config)
    }
}

/// Upgrades an own settlement to a city.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCityAction {
    pub actor: PlayerId,
    pub vertex: VertexId,
}

impl ActionTransition for BuildCityAction {
    type Error = BuildError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Action {
            return Err(BuildError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        if !state.topology.contains_vertex(self.vertex) {
            return Err(BuildError::UnknownSlot);
        }
        match state.board.building(self.vertex) {
            None => return Err(BuildError::NoSettlementToUpgrade),
            Some(building) if building.owner != self.actor => {
                return Err(BuildError::NotYourSettlement);
            }
            Some(building) if building.kind == BuildingKind::City => {
                return Err(BuildError::SlotOccupied);
            }
            Some(_) => {}
        }
        let cost = config::city_cost();
        if !state.player(self.actor).resources.covers(&cost) {
            return Err(BuildError::InsufficientResources { cost });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, config: &GameConfig) -> Result<ActionResult, Self::Error> {
        charge(state, self.actor, &config::city_cost())?;
        state.board.set_building(
            self.vertex,
            Building {
                owner: self.actor,
                kind: BuildingKind::City,
                origin: PlacementOrigin::PlayerAction,
            },
        );
        Ok(ActionResult::CityBuilt {
            vertex: self.vertex,
        })
    }

    fn post_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), Self::Error> {
        conserved(state, config)
    }
}
