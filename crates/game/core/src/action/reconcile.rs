//! Vision-derived board corrections.
//!
//! When the camera persistently sees a piece on a slot the action log never
//! filled, the reconciler proposes this system transition through the normal
//! commit path. Validation is as strict as for player builds: a correction
//! that would break placement invariants is rejected, and the caller surfaces
//! it as a conflict instead of applying it.

use serde::{Deserialize, Serialize};

use crate::action::{ActionResult, ActionTransition};
use crate::board::SlotId;
use crate::config::GameConfig;
use crate::scoring;
use crate::state::{
    Building, BuildingKind, GameState, PlacementOrigin, PlayerId, RoadPiece,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("slot does not exist on this board")]
    UnknownSlot,

    #[error("slot is action-derived and owned by {owner}; refusing to overwrite")]
    ActionDerivedOccupant { owner: PlayerId },

    #[error("slot already holds this occupant")]
    AlreadyConsistent,

    #[error("a neighboring vertex already carries a building")]
    SpacingViolated,

    #[error("no road or building of {owner} connects to this slot")]
    NotConnected { owner: PlayerId },

    #[error("the game has ended")]
    GameEnded,
}

/// Writes a camera-confirmed piece into the canonical state.
///
/// Only fills empty slots, or replaces an earlier vision-derived entry that
/// sustained observation now contradicts. Action-derived occupancy is
/// authoritative and never overwritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileAction {
    pub slot: SlotId,
    pub owner: PlayerId,
}

impl ActionTransition for ReconcileAction {
    type Error = ReconcileError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase == crate::state::TurnPhase::Ended {
            return Err(ReconcileError::GameEnded);
        }
        match self.slot {
            SlotId::Vertex(vertex) => {
                if !state.topology.contains_vertex(vertex) {
                    return Err(ReconcileError::UnknownSlot);
                }
                match state.board.building(vertex) {
                    Some(building) if building.origin == PlacementOrigin::PlayerAction => {
                        return Err(ReconcileError::ActionDerivedOccupant {
                            owner: building.owner,
                        });
                    }
                    Some(building) if building.owner == self.owner => {
                        return Err(ReconcileError::AlreadyConsistent);
                    }
                    // Replacing a vision-derived entry: spacing already held
                    // when it was applied.
                    Some(_) => {}
                    None => {
                        if !state.board.respects_spacing(&state.topology, vertex) {
                            return Err(ReconcileError::SpacingViolated);
                        }
                    }
                }
                if !state
                    .board
                    .player_reaches_vertex(&state.topology, self.owner, vertex)
                {
                    return Err(ReconcileError::NotConnected { owner: self.owner });
                }
            }
            SlotId::Edge(edge) => {
                if !state.topology.contains_edge(edge) {
                    return Err(ReconcileError::UnknownSlot);
                }
                match state.board.road(edge) {
                    Some(road) if road.origin == PlacementOrigin::PlayerAction => {
                        return Err(ReconcileError::ActionDerivedOccupant { owner: road.owner });
                    }
                    Some(road) if road.owner == self.owner => {
                        return Err(ReconcileError::AlreadyConsistent);
                    }
                    Some(_) => {}
                    None => {}
                }
                let endpoints = state.topology.edge(edge);
                let connected = state
                    .board
                    .player_reaches_vertex(&state.topology, self.owner, endpoints.a)
                    || state
                        .board
                        .player_reaches_vertex(&state.topology, self.owner, endpoints.b);
                if !connected {
                    return Err(ReconcileError::NotConnected { owner: self.owner });
                }
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, config: &GameConfig) -> Result<ActionResult, Self::Error> {
        match self.slot {
            SlotId::Vertex(vertex) => {
                state.board.set_building(
                    vertex,
                    Building {
                        owner: self.owner,
                        kind: BuildingKind::Settlement,
                        origin: PlacementOrigin::Vision,
                    },
                );
            }
            SlotId::Edge(edge) => {
                state.board.set_road(
                    edge,
                    RoadPiece {
                        owner: self.owner,
                        origin: PlacementOrigin::Vision,
                    },
                );
            }
        }
        scoring::refresh_road_bonus(state, config);
        Ok(ActionResult::Reconciled {
            slot: self.slot,
            owner: self.owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{EdgeId, VertexId, standard_topology};
    use crate::state::{Resource, TurnState, TurnPhase};

    fn main_loop_state() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(standard_topology(10), 11, &config);
        state.turn = TurnState {
            phase: TurnPhase::Action,
            setup: None,
            turn_number: 1,
            ..TurnState::new()
        };
        (state, config)
    }

    fn road(owner: PlayerId, origin: PlacementOrigin) -> RoadPiece {
        RoadPiece { owner, origin }
    }

    #[test]
    fn fills_a_gap_reachable_by_the_owner() {
        let (mut state, config) = main_loop_state();
        let owner = PlayerId(1);
        let edge = EdgeId(4);
        let vertex = state.topology.edge(edge).a;
        state
            .board
            .set_road(edge, road(owner, PlacementOrigin::PlayerAction));

        let action = ReconcileAction {
            slot: SlotId::Vertex(vertex),
            owner,
        };
        assert!(action.pre_validate(&state, &config).is_ok());
        action.apply(&mut state, &config).unwrap();

        let building = state.board.building(vertex).unwrap();
        assert_eq!(building.owner, owner);
        assert_eq!(building.origin, PlacementOrigin::Vision);
    }

    #[test]
    fn never_overwrites_action_derived_occupancy() {
        let (mut state, config) = main_loop_state();
        let edge = EdgeId(2);
        state
            .board
            .set_road(edge, road(PlayerId(0), PlacementOrigin::PlayerAction));

        let action = ReconcileAction {
            slot: SlotId::Edge(edge),
            owner: PlayerId(1),
        };
        assert_eq!(
            action.pre_validate(&state, &config),
            Err(ReconcileError::ActionDerivedOccupant { owner: PlayerId(0) })
        );
    }

    #[test]
    fn corrects_an_earlier_vision_entry() {
        let (mut state, config) = main_loop_state();
        let edge = EdgeId(2);
        let anchor = state.topology.edge(edge).a;
        // The true owner reaches the slot; the stale vision entry said
        // someone else.
        state.board.set_building(
            anchor,
            Building {
                owner: PlayerId(2),
                kind: BuildingKind::Settlement,
                origin: PlacementOrigin::PlayerAction,
            },
        );
        state
            .board
            .set_road(edge, road(PlayerId(0), PlacementOrigin::Vision));

        let action = ReconcileAction {
            slot: SlotId::Edge(edge),
            owner: PlayerId(2),
        };
        assert!(action.pre_validate(&state, &config).is_ok());
        action.apply(&mut state, &config).unwrap();
        assert_eq!(state.board.road(edge).unwrap().owner, PlayerId(2));
    }

    #[test]
    fn unreachable_gap_is_rejected() {
        let (state, config) = main_loop_state();
        let action = ReconcileAction {
            slot: SlotId::Vertex(VertexId(20)),
            owner: PlayerId(0),
        };
        assert_eq!(
            action.pre_validate(&state, &config),
            Err(ReconcileError::NotConnected { owner: PlayerId(0) })
        );
    }

    #[test]
    fn spacing_still_binds_vision_fills() {
        let (mut state, config) = main_loop_state();
        let edge = EdgeId(6);
        let vertex = state.topology.edge(edge).a;
        let neighbor = state.topology.neighbors(vertex).next().unwrap();

        state
            .board
            .set_road(edge, road(PlayerId(0), PlacementOrigin::PlayerAction));
        state.board.set_building(
            neighbor,
            Building {
                owner: PlayerId(1),
                kind: BuildingKind::Settlement,
                origin: PlacementOrigin::PlayerAction,
            },
        );

        let action = ReconcileAction {
            slot: SlotId::Vertex(vertex),
            owner: PlayerId(0),
        };
        assert_eq!(
            action.pre_validate(&state, &config),
            Err(ReconcileError::SpacingViolated)
        );
    }

    // Resource counts are untouched by reconciliation.
    #[test]
    fn reconcile_moves_no_resources() {
        let (mut state, config) = main_loop_state();
        let owner = PlayerId(1);
        let edge = EdgeId(4);
        let vertex = state.topology.edge(edge).a;
        state
            .board
            .set_road(edge, road(owner, PlacementOrigin::PlayerAction));
        let bank_before = state.bank.resources;

        ReconcileAction {
            slot: SlotId::Vertex(vertex),
            owner,
        }
        .apply(&mut state, &config)
        .unwrap();

        assert_eq!(state.bank.resources, bank_before);
        assert_eq!(state.player(owner).resources.get(Resource::Wood), 0);
        assert!(state.resources_conserved(&config));
    }
}
