//! Camera-space positions of board slots.
//!
//! The vision front end reports detections in camera pixels; the matcher
//! needs to know where each building and road slot sits in that frame.
//! Calibration is measured once per physical table and loaded with the
//! board configuration.

use serde::{Deserialize, Serialize};

use super::{EdgeId, SlotId, VertexId};

/// A point in the camera frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPoint {
    pub x: f32,
    pub y: f32,
}

impl CameraPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: CameraPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Slot-to-camera-point table. Slots without a measured point are simply
/// invisible to the matcher.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    vertices: Vec<Option<CameraPoint>>,
    edges: Vec<Option<CameraPoint>>,
}

impl Calibration {
    pub fn new(vertex_count: usize, edge_count: usize) -> Self {
        Self {
            vertices: vec![None; vertex_count],
            edges: vec![None; edge_count],
        }
    }

    pub fn set(&mut self, slot: SlotId, point: CameraPoint) {
        match slot {
            SlotId::Vertex(v) => self.vertices[v.0 as usize] = Some(point),
            SlotId::Edge(e) => self.edges[e.0 as usize] = Some(point),
        }
    }

    pub fn point(&self, slot: SlotId) -> Option<CameraPoint> {
        match slot {
            SlotId::Vertex(v) => self.vertices.get(v.0 as usize).copied().flatten(),
            SlotId::Edge(e) => self.edges.get(e.0 as usize).copied().flatten(),
        }
    }

    /// All calibrated slots with their camera points.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, CameraPoint)> + '_ {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (SlotId::Vertex(VertexId(i as u8)), p)));
        let edges = self
            .edges
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (SlotId::Edge(EdgeId(i as u8)), p)));
        vertices.chain(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_lookup() {
        let mut calibration = Calibration::new(2, 1);
        calibration.set(SlotId::Vertex(VertexId(1)), CameraPoint::new(10.0, 20.0));
        calibration.set(SlotId::Edge(EdgeId(0)), CameraPoint::new(5.0, 5.0));

        assert_eq!(
            calibration.point(SlotId::Vertex(VertexId(1))),
            Some(CameraPoint::new(10.0, 20.0))
        );
        assert!(calibration.point(SlotId::Vertex(VertexId(0))).is_none());
        assert_eq!(calibration.iter().count(), 2);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = CameraPoint::new(0.0, 0.0);
        let b = CameraPoint::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < f32::EPSILON);
    }
}
