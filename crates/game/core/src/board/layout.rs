//! Standard board generation.
//!
//! Builds the regular 19-hex board from axial coordinates: corners are
//! deduplicated by rounded world coordinate, sides become canonical edges,
//! and terrain/roll numbers are dealt from the fixed pools with a
//! deterministic shuffle.

use std::collections::BTreeMap;

use crate::rng::PcgStream;

use super::{
    BoardTopology, Calibration, CameraPoint, Edge, EdgeId, Harbor, Hex, SlotId, Terrain, VertexId,
};

const SQRT3: f64 = 1.732050807568877;

/// Axial coordinates of the 19 tiles, row by row.
const AXIAL_TILES: [(i32, i32); 19] = [
    (0, -2),
    (1, -2),
    (2, -2),
    (-1, -1),
    (0, -1),
    (1, -1),
    (2, -1),
    (-2, 0),
    (-1, 0),
    (0, 0),
    (1, 0),
    (2, 0),
    (-2, 1),
    (-1, 1),
    (0, 1),
    (1, 1),
    (-2, 2),
    (-1, 2),
    (0, 2),
];

/// Corner offsets of a pointy-top hex, clockwise from the top.
const CORNERS: [(f64, f64); 6] = [
    (0.0, -1.0),
    (SQRT3 / 2.0, -0.5),
    (SQRT3 / 2.0, 0.5),
    (0.0, 1.0),
    (-SQRT3 / 2.0, 0.5),
    (-SQRT3 / 2.0, -0.5),
];

/// Terrain pool: 4 wood, 3 brick, 4 sheep, 4 wheat, 3 ore, 1 desert.
const TERRAIN_POOL: [Terrain; 19] = [
    Terrain::Wood,
    Terrain::Wood,
    Terrain::Wood,
    Terrain::Wood,
    Terrain::Brick,
    Terrain::Brick,
    Terrain::Brick,
    Terrain::Sheep,
    Terrain::Sheep,
    Terrain::Sheep,
    Terrain::Sheep,
    Terrain::Wheat,
    Terrain::Wheat,
    Terrain::Wheat,
    Terrain::Wheat,
    Terrain::Ore,
    Terrain::Ore,
    Terrain::Ore,
    Terrain::Desert,
];

/// Roll-number pool for the 18 producing tiles.
const ROLL_NUMBER_POOL: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

fn hex_center(q: i32, r: i32) -> (f64, f64) {
    let x = SQRT3 * (q as f64 + r as f64 / 2.0);
    let y = 1.5 * r as f64;
    (x, y)
}

/// Coordinate key stable under floating-point noise.
fn coord_key(x: f64, y: f64) -> (i64, i64) {
    ((x * 1e6).round() as i64, (y * 1e6).round() as i64)
}

/// Projection into the default camera frame.
fn to_pixels(x: f64, y: f64) -> CameraPoint {
    const SCALE: f64 = 115.0;
    const OFFSET_X: f64 = 960.0;
    const OFFSET_Y: f64 = 540.0;
    CameraPoint {
        x: (OFFSET_X + x * SCALE) as f32,
        y: (OFFSET_Y + y * SCALE) as f32,
    }
}

struct Geometry {
    /// World position of every vertex, indexed by `VertexId`.
    vertex_positions: Vec<(f64, f64)>,
    /// Corner vertex ids of each tile.
    tile_corners: Vec<[VertexId; 6]>,
    /// Canonical edges, sorted by endpoints.
    edges: Vec<Edge>,
}

fn build_geometry() -> Geometry {
    let mut vertex_by_key: BTreeMap<(i64, i64), VertexId> = BTreeMap::new();
    let mut vertex_positions: Vec<(f64, f64)> = Vec::new();
    let mut tile_corners: Vec<[VertexId; 6]> = Vec::new();

    for (q, r) in AXIAL_TILES {
        let (cx, cy) = hex_center(q, r);
        let mut corners = [VertexId(0); 6];

        for (i, (dx, dy)) in CORNERS.iter().enumerate() {
            let x = cx + dx;
            let y = cy + dy;
            let key = coord_key(x, y);
            let id = *vertex_by_key.entry(key).or_insert_with(|| {
                let id = VertexId(vertex_positions.len() as u8);
                vertex_positions.push((x, y));
                id
            });
            corners[i] = id;
        }

        tile_corners.push(corners);
    }

    let mut edge_set: std::collections::BTreeSet<(u8, u8)> = std::collections::BTreeSet::new();
    for corners in &tile_corners {
        for i in 0..6 {
            let edge = Edge::new(corners[i], corners[(i + 1) % 6]);
            edge_set.insert((edge.a.0, edge.b.0));
        }
    }
    let edges = edge_set
        .into_iter()
        .map(|(a, b)| Edge::new(VertexId(a), VertexId(b)))
        .collect();

    Geometry {
        vertex_positions,
        tile_corners,
        edges,
    }
}

/// Build the regular board with terrain and roll numbers dealt from `seed`.
///
/// The desert gets no roll number; the caller places the robber there.
pub fn standard_topology(seed: u64) -> BoardTopology {
    standard_topology_with_harbors(seed, Vec::new())
}

/// Same as [`standard_topology`], with harbors attached to the given slots.
pub fn standard_topology_with_harbors(seed: u64, harbors: Vec<Harbor>) -> BoardTopology {
    let geometry = build_geometry();

    let mut terrains = TERRAIN_POOL;
    let mut rolls = ROLL_NUMBER_POOL;
    let mut stream = PcgStream::new(seed);
    stream.shuffle(&mut terrains);
    stream.shuffle(&mut rolls);

    let mut roll_index = 0;
    let hexes = geometry
        .tile_corners
        .iter()
        .zip(terrains.iter())
        .map(|(corners, &terrain)| {
            let roll_number = if terrain == Terrain::Desert {
                None
            } else {
                let n = rolls[roll_index];
                roll_index += 1;
                Some(n)
            };
            Hex {
                terrain,
                roll_number,
                vertices: *corners,
            }
        })
        .collect();

    BoardTopology::new(
        hexes,
        geometry.edges,
        geometry.vertex_positions.len(),
        harbors,
    )
}

/// Camera calibration derived from the layout projection.
///
/// Real tables replace this with measured coordinates; the derived points are
/// good enough for fixtures and for running without a calibration file.
pub fn default_calibration() -> Calibration {
    let geometry = build_geometry();
    let mut calibration = Calibration::new(geometry.vertex_positions.len(), geometry.edges.len());

    for (i, &(x, y)) in geometry.vertex_positions.iter().enumerate() {
        calibration.set(SlotId::Vertex(VertexId(i as u8)), to_pixels(x, y));
    }
    for (i, edge) in geometry.edges.iter().enumerate() {
        let (ax, ay) = geometry.vertex_positions[edge.a.0 as usize];
        let (bx, by) = geometry.vertex_positions[edge.b.0 as usize];
        calibration.set(
            SlotId::Edge(EdgeId(i as u8)),
            to_pixels((ax + bx) / 2.0, (ay + by) / 2.0),
        );
    }

    calibration
}
