//! Mutable board occupancy layered over the fixed topology.

use serde::{Deserialize, Serialize};

use crate::board::{BoardTopology, EdgeId, HexId, SlotId, VertexId};
use crate::state::PlayerId;

/// How a placement entered the canonical state. Action-derived placements
/// are authoritative over anything the camera reports later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementOrigin {
    PlayerAction,
    Vision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingKind {
    Settlement,
    City,
}

impl BuildingKind {
    /// Units produced per adjacent hex when its number is rolled.
    pub fn production_yield(self) -> u8 {
        match self {
            BuildingKind::Settlement => 1,
            BuildingKind::City => 2,
        }
    }

    /// Base victory points for the structure.
    pub fn victory_points(self) -> u8 {
        match self {
            BuildingKind::Settlement => 1,
            BuildingKind::City => 2,
        }
    }
}

/// A settlement or city on a vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub owner: PlayerId,
    pub kind: BuildingKind,
    pub origin: PlacementOrigin,
}

/// A road on an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadPiece {
    pub owner: PlayerId,
    pub origin: PlacementOrigin,
}

/// Occupancy of every slot plus the robber position. The graph itself never
/// changes; only these fields do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    buildings: Vec<Option<Building>>,
    roads: Vec<Option<RoadPiece>>,
    /// Hex currently blocked by the robber.
    pub robber: Option<HexId>,
}

impl BoardState {
    /// Empty occupancy sized to the topology, robber on the desert.
    pub fn new(topology: &BoardTopology) -> Self {
        Self {
            buildings: vec![None; topology.vertex_count()],
            roads: vec![None; topology.edge_count()],
            robber: topology.desert(),
        }
    }

    pub fn building(&self, vertex: VertexId) -> Option<&Building> {
        self.buildings[vertex.0 as usize].as_ref()
    }

    pub fn road(&self, edge: EdgeId) -> Option<&RoadPiece> {
        self.roads[edge.0 as usize].as_ref()
    }

    pub fn set_building(&mut self, vertex: VertexId, building: Building) {
        self.buildings[vertex.0 as usize] = Some(building);
    }

    pub fn set_road(&mut self, edge: EdgeId, road: RoadPiece) {
        self.roads[edge.0 as usize] = Some(road);
    }

    /// Owner and provenance of whatever occupies a slot, if anything.
    pub fn slot_occupant(&self, slot: SlotId) -> Option<(PlayerId, PlacementOrigin)> {
        match slot {
            SlotId::Vertex(v) => self.building(v).map(|b| (b.owner, b.origin)),
            SlotId::Edge(e) => self.road(e).map(|r| (r.owner, r.origin)),
        }
    }

    pub fn buildings(&self) -> impl Iterator<Item = (VertexId, &Building)> {
        self.buildings
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.as_ref().map(|b| (VertexId(i as u8), b)))
    }

    pub fn roads(&self) -> impl Iterator<Item = (EdgeId, &RoadPiece)> {
        self.roads
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|r| (EdgeId(i as u8), r)))
    }

    pub fn buildings_of(&self, player: PlayerId) -> impl Iterator<Item = (VertexId, &Building)> {
        self.buildings().filter(move |(_, b)| b.owner == player)
    }

    pub fn roads_of(&self, player: PlayerId) -> impl Iterator<Item = (EdgeId, &RoadPiece)> {
        self.roads().filter(move |(_, r)| r.owner == player)
    }

    /// True if `player` has a road or building touching `vertex`.
    pub fn player_reaches_vertex(
        &self,
        topology: &BoardTopology,
        player: PlayerId,
        vertex: VertexId,
    ) -> bool {
        if self.building(vertex).is_some_and(|b| b.owner == player) {
            return true;
        }
        topology
            .edges_at(vertex)
            .iter()
            .any(|&e| self.road(e).is_some_and(|r| r.owner == player))
    }

    /// Distance rule: a settlement needs every neighboring vertex empty.
    pub fn respects_spacing(&self, topology: &BoardTopology, vertex: VertexId) -> bool {
        topology.neighbors(vertex).all(|n| self.building(n).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::standard_topology;

    #[test]
    fn fresh_board_is_empty_with_robber_on_desert() {
        let topology = standard_topology(3);
        let board = BoardState::new(&topology);
        assert_eq!(board.buildings().count(), 0);
        assert_eq!(board.roads().count(), 0);
        assert_eq!(board.robber, topology.desert());
    }

    #[test]
    fn spacing_rule_detects_adjacent_building() {
        let topology = standard_topology(3);
        let mut board = BoardState::new(&topology);
        let vertex = VertexId(0);
        let neighbor = topology.neighbors(vertex).next().unwrap();

        assert!(board.respects_spacing(&topology, vertex));
        board.set_building(
            neighbor,
            Building {
                owner: PlayerId(1),
                kind: BuildingKind::Settlement,
                origin: PlacementOrigin::PlayerAction,
            },
        );
        assert!(!board.respects_spacing(&topology, vertex));
    }

    #[test]
    fn reachability_through_roads() {
        let topology = standard_topology(3);
        let mut board = BoardState::new(&topology);
        let edge_id = EdgeId(0);
        let edge = topology.edge(edge_id);

        assert!(!board.player_reaches_vertex(&topology, PlayerId(0), edge.a));
        board.set_road(
            edge_id,
            RoadPiece {
                owner: PlayerId(0),
                origin: PlacementOrigin::PlayerAction,
            },
        );
        assert!(board.player_reaches_vertex(&topology, PlayerId(0), edge.a));
        assert!(board.player_reaches_vertex(&topology, PlayerId(0), edge.b));
        assert!(!board.player_reaches_vertex(&topology, PlayerId(1), edge.a));
    }
}
