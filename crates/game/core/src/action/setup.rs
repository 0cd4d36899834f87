//! Initial snake placements.

use serde::{Deserialize, Serialize};

use crate::action::{ActionResult, ActionTransition};
use crate::board::{EdgeId, VertexId};
use crate::config::GameConfig;
use crate::state::{
    Building, BuildingKind, GameState, PlacementOrigin, PlayerId, RoadPiece, TurnPhase,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("setup placements are over")]
    WrongPhase { phase: TurnPhase },

    #[error("slot does not exist on this board")]
    UnknownSlot,

    #[error("vertex is already occupied")]
    VertexOccupied,

    #[error("a neighboring vertex already carries a building")]
    SpacingViolated,

    #[error("edge is already occupied")]
    EdgeOccupied,

    #[error("road must touch the new settlement")]
    EdgeNotAdjacent,
}

/// One free settlement plus its adjacent road, placed during setup.
///
/// The distance rule applies from the first placement; road connectivity is
/// waived because the settlement itself anchors the road.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupPlaceAction {
    pub actor: PlayerId,
    pub vertex: VertexId,
    pub edge: EdgeId,
}

impl ActionTransition for SetupPlaceAction {
    type Error = SetupError;

    fn pre_validate(&self, state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        if state.turn.phase != TurnPhase::Setup {
            return Err(SetupError::WrongPhase {
                phase: state.turn.phase,
            });
        }
        if !state.topology.contains_vertex(self.vertex) || !state.topology.contains_edge(self.edge)
        {
            return Err(SetupError::UnknownSlot);
        }
        if state.board.building(self.vertex).is_some() {
            return Err(SetupError::VertexOccupied);
        }
        if !state.board.respects_spacing(&state.topology, self.vertex) {
            return Err(SetupError::SpacingViolated);
        }
        if state.board.road(self.edge).is_some() {
            return Err(SetupError::EdgeOccupied);
        }
        if !state.topology.edge(self.edge).touches(self.vertex) {
            return Err(SetupError::EdgeNotAdjacent);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, config: &GameConfig) -> Result<ActionResult, Self::Error> {
        state.board.set_building(
            self.vertex,
            Building {
                owner: self.actor,
                kind: BuildingKind::Settlement,
                origin: PlacementOrigin::PlayerAction,
            },
        );
        state.board.set_road(
            self.edge,
            RoadPiece {
                owner: self.actor,
                origin: PlacementOrigin::PlayerAction,
            },
        );

        let progress = state
            .turn
            .setup
            .expect("setup phase always carries progress");
        match progress.advanced(config.setup_rounds) {
            Some(next) => {
                state.turn.setup = Some(next);
                state.turn.active_player = next.current_player();
            }
            None => {
                // Snake finished; the main loop starts with the first seat.
                state.turn.setup = None;
                state.turn.phase = TurnPhase::Roll;
                state.turn.active_player = PlayerId(0);
                state.turn.turn_number = 1;
            }
        }

        Ok(ActionResult::SetupPlaced {
            vertex: self.vertex,
            edge: self.edge,
        })
    }
}
