//! Immutable board topology.
//!
//! The hex grid, its vertices and edges, and any harbors are fixed when a
//! session starts. Everything that changes during play (building and road
//! occupancy, the robber) lives in [`crate::state::BoardState`]; this module
//! only answers adjacency questions.

mod calibration;
mod layout;

pub use calibration::{Calibration, CameraPoint};
pub use layout::{default_calibration, standard_topology, standard_topology_with_harbors};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::Resource;

/// Index of a hex tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexId(pub u8);

/// Index of a building slot (hex corner).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u8);

/// Index of a road slot (hex side).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u8);

/// Any position the camera can observe: a building slot or a road slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotId {
    Vertex(VertexId),
    Edge(EdgeId),
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Vertex(v) => write!(f, "vertex {}", v.0),
            SlotId::Edge(e) => write!(f, "edge {}", e.0),
        }
    }
}

/// Tile terrain. Named by the resource it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Wood,
    Brick,
    Sheep,
    Wheat,
    Ore,
    Desert,
}

impl Terrain {
    /// Resource credited when this tile produces, if any.
    pub fn resource(self) -> Option<Resource> {
        match self {
            Terrain::Wood => Some(Resource::Wood),
            Terrain::Brick => Some(Resource::Brick),
            Terrain::Sheep => Some(Resource::Sheep),
            Terrain::Wheat => Some(Resource::Wheat),
            Terrain::Ore => Some(Resource::Ore),
            Terrain::Desert => None,
        }
    }
}

/// One hex tile: terrain, production number, and its six corners.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    pub terrain: Terrain,
    /// Dice total that triggers production. `None` for the desert.
    pub roll_number: Option<u8>,
    /// Corner vertices in layout order.
    pub vertices: [VertexId; 6],
}

/// A road slot between two vertices. Endpoints are stored canonically
/// (`a < b`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub a: VertexId,
    pub b: VertexId,
}

impl Edge {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }

    /// The endpoint that is not `vertex`.
    pub fn other(&self, vertex: VertexId) -> VertexId {
        if self.a == vertex { self.b } else { self.a }
    }

    pub fn touches(&self, vertex: VertexId) -> bool {
        self.a == vertex || self.b == vertex
    }
}

/// Harbor kind determining the bank trade rate from an adjacent building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarborKind {
    /// 3:1 for any resource.
    Generic,
    /// 2:1 for the named resource.
    Resource(Resource),
}

/// A harbor attached to one building slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Harbor {
    pub vertex: VertexId,
    pub kind: HarborKind,
}

/// The fixed board graph.
///
/// Construction validates nothing beyond index bounds; use
/// [`standard_topology`] for the regular 19-hex board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTopology {
    hexes: Vec<Hex>,
    edges: Vec<Edge>,
    vertex_count: usize,
    /// Edge ids incident to each vertex.
    vertex_edges: Vec<Vec<EdgeId>>,
    harbors: Vec<Harbor>,
}

impl BoardTopology {
    pub fn new(
        hexes: Vec<Hex>,
        edges: Vec<Edge>,
        vertex_count: usize,
        harbors: Vec<Harbor>,
    ) -> Self {
        let mut vertex_edges = vec![Vec::new(); vertex_count];
        for (idx, edge) in edges.iter().enumerate() {
            vertex_edges[edge.a.0 as usize].push(EdgeId(idx as u8));
            vertex_edges[edge.b.0 as usize].push(EdgeId(idx as u8));
        }
        Self {
            hexes,
            edges,
            vertex_count,
            vertex_edges,
            harbors,
        }
    }

    pub fn hex(&self, id: HexId) -> &Hex {
        &self.hexes[id.0 as usize]
    }

    pub fn hexes(&self) -> impl Iterator<Item = (HexId, &Hex)> {
        self.hexes
            .iter()
            .enumerate()
            .map(|(i, h)| (HexId(i as u8), h))
    }

    pub fn hex_count(&self) -> usize {
        self.hexes.len()
    }

    pub fn edge(&self, id: EdgeId) -> Edge {
        self.edges[id.0 as usize]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        (id.0 as usize) < self.vertex_count
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        (id.0 as usize) < self.edges.len()
    }

    /// Road slots incident to a building slot.
    pub fn edges_at(&self, vertex: VertexId) -> &[EdgeId] {
        &self.vertex_edges[vertex.0 as usize]
    }

    /// Building slots one road away from `vertex`.
    pub fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.edges_at(vertex)
            .iter()
            .map(move |&e| self.edge(e).other(vertex))
    }

    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let wanted = Edge::new(a, b);
        self.edges_at(a)
            .iter()
            .copied()
            .find(|&e| self.edge(e) == wanted)
    }

    /// The desert hex, which hosts the robber at setup.
    pub fn desert(&self) -> Option<HexId> {
        self.hexes()
            .find(|(_, hex)| hex.terrain == Terrain::Desert)
            .map(|(id, _)| id)
    }

    pub fn harbors(&self) -> &[Harbor] {
        &self.harbors
    }

    /// Harbors reachable from a building on `vertex`.
    pub fn harbors_at(&self, vertex: VertexId) -> impl Iterator<Item = HarborKind> + '_ {
        self.harbors
            .iter()
            .filter(move |h| h.vertex == vertex)
            .map(|h| h.kind)
    }
}
